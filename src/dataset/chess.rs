//! Chess-variant scenarios: familiar pieces with redefined movement.
//!
//! Each variant states a movement rule that contradicts standard chess,
//! then asks whether a concrete move succeeds under that rule. Legality
//! is computed from board geometry, never from real chess knowledge.

use std::collections::BTreeMap;

use serde_json::json;

use super::{Domain, Scenario, ANSWER_TYPE_MULTIPLE_CHOICE};

// ---------------------------------------------------------------------------
// Board geometry
// ---------------------------------------------------------------------------

/// Convert an algebraic square like "e4" to (file, rank), both 0-7.
///
/// Inputs come from the fixed tables below and are always two ASCII
/// characters in range.
fn square_to_coord(square: &str) -> (i32, i32) {
    let bytes = square.as_bytes();
    debug_assert_eq!(bytes.len(), 2, "square must be algebraic, e.g. \"e4\"");
    let file = (bytes[0].to_ascii_lowercase() - b'a') as i32;
    let rank = (bytes[1] - b'1') as i32;
    (file, rank)
}

/// Absolute (file, rank) offsets between two squares.
fn move_offsets(start: &str, end: &str) -> (i32, i32) {
    let (sf, sr) = square_to_coord(start);
    let (ef, er) = square_to_coord(end);
    ((ef - sf).abs(), (er - sr).abs())
}

/// True when the offsets form an L-shape: one step on one axis, two on
/// the other.
fn is_l_shape(dx: i32, dy: i32) -> bool {
    let (lo, hi) = if dx <= dy { (dx, dy) } else { (dy, dx) };
    lo == 1 && hi == 2
}

// ---------------------------------------------------------------------------
// Scenario assembly
// ---------------------------------------------------------------------------

fn move_scenario(variant: &str, index: usize, rule: &str, start: &str, end: &str, legal: bool) -> Scenario {
    let mut choices = BTreeMap::new();
    choices.insert(
        "A".to_string(),
        "The move is legal under the variant rules.".to_string(),
    );
    choices.insert(
        "B".to_string(),
        "The move is illegal under the variant rules.".to_string(),
    );
    Scenario {
        id: format!("chess_{}_{}", variant, index),
        domain: Domain::Chess,
        rule: rule.to_string(),
        question: format!(
            "A piece starts on {} and targets {}. Does the move succeed under this variant?",
            start.to_uppercase(),
            end.to_uppercase()
        ),
        choices,
        correct_choice: if legal { "A" } else { "B" }.to_string(),
        answer_type: ANSWER_TYPE_MULTIPLE_CHOICE.to_string(),
        metadata: json!({ "start": start, "end": end }),
    }
}

/// Build the 25 chess scenarios: five variants, five move cases each.
pub fn build() -> Vec<Scenario> {
    let mut scenarios = Vec::new();

    // Knights move like bishops: any-length diagonal.
    let knight_as_bishop = [("c3", "f6"), ("b1", "c3"), ("e4", "b7"), ("g1", "e2"), ("d5", "a8")];
    for (idx, (start, end)) in knight_as_bishop.iter().enumerate() {
        let (dx, dy) = move_offsets(start, end);
        let legal = dx == dy && dx > 0;
        scenarios.push(move_scenario(
            "knight_as_bishop",
            idx + 1,
            "Knights move exactly like bishops (any-length diagonals).",
            start,
            end,
            legal,
        ));
    }

    // Bishops move like knights: L-shaped jumps.
    let bishop_as_knight = [("c1", "d3"), ("f1", "c4"), ("a3", "b5"), ("e3", "f5"), ("h4", "g6")];
    for (idx, (start, end)) in bishop_as_knight.iter().enumerate() {
        let (dx, dy) = move_offsets(start, end);
        scenarios.push(move_scenario(
            "bishop_as_knight",
            idx + 1,
            "Bishops move like knights (standard L-shapes).",
            start,
            end,
            is_l_shape(dx, dy),
        ));
    }

    // Rooks limited to king moves: one square in any direction.
    let rook_as_king = [("a1", "a2"), ("d4", "e5"), ("h8", "g8"), ("c6", "d7"), ("e2", "e4")];
    for (idx, (start, end)) in rook_as_king.iter().enumerate() {
        let (dx, dy) = move_offsets(start, end);
        let legal = dx.max(dy) == 1;
        scenarios.push(move_scenario(
            "rook_as_king",
            idx + 1,
            "Rooks may only move one square in any direction (like kings).",
            start,
            end,
            legal,
        ));
    }

    // Pawns move one square backward instead of forward. Only the rank
    // delta matters; captures and en passant are out of scope.
    let pawn_backward = [
        ("white", "d4", "d3"),
        ("white", "c2", "c1"),
        ("black", "f5", "f6"),
        ("black", "b7", "b8"),
        ("white", "g5", "g6"),
    ];
    for (idx, (color, start, end)) in pawn_backward.iter().enumerate() {
        let (_, sr) = square_to_coord(start);
        let (_, er) = square_to_coord(end);
        let delta = er - sr;
        let legal = match *color {
            "white" => delta == -1,
            _ => delta == 1,
        };
        scenarios.push(move_scenario(
            "pawn_backward",
            idx + 1,
            "Pawns move exactly one square backward (opposite of normal direction) and do not move forward.",
            start,
            end,
            legal,
        ));
    }

    // Queens move only like knights.
    let queen_as_knight = [("d1", "f2"), ("h4", "g6"), ("c3", "d5"), ("e5", "f7"), ("a8", "b6")];
    for (idx, (start, end)) in queen_as_knight.iter().enumerate() {
        let (dx, dy) = move_offsets(start, end);
        scenarios.push(move_scenario(
            "queen_as_knight",
            idx + 1,
            "Queens move exactly like knights (L-shapes only).",
            start,
            end,
            is_l_shape(dx, dy),
        ));
    }

    scenarios
}
