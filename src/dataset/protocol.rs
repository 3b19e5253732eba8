//! Social-protocol scenarios: workplace conventions with inverted defaults.
//!
//! Unlike the chess and arithmetic builders these cases are not computed;
//! each is a hand-written rule/question/options tuple wrapped into the
//! common scenario shape.

use std::collections::BTreeMap;

use serde_json::json;

use super::{Domain, Scenario, ANSWER_TYPE_MULTIPLE_CHOICE};

type ProtocolCase = (&'static str, &'static str, &'static [(&'static str, &'static str)], &'static str);

const CASES: [ProtocolCase; 15] = [
    (
        "In this workshop, participants must greet by stating their favorite prime number instead of saying hello.",
        "You enter the room. How should you greet the group?",
        &[
            ("A", "Say “Hello everyone!”"),
            ("B", "State your favorite prime number."),
            ("C", "Remain silent and wave."),
        ],
        "B",
    ),
    (
        "During team standups, everyone reports blockers before successes.",
        "It's your turn to speak. What do you mention first?",
        &[
            ("A", "Share a recent win."),
            ("B", "Present blockers you're facing."),
            ("C", "Thank the team lead."),
        ],
        "B",
    ),
    (
        "In this lab, gloves must be worn inside-out to show the colored lining for quick contamination checks.",
        "How do you put on gloves before starting?",
        &[
            ("A", "Wear gloves normally."),
            ("B", "Wear gloves inside-out."),
            ("C", "Skip gloves for short tasks."),
        ],
        "B",
    ),
    (
        "Company visitors receive tea unless they explicitly request coffee.",
        "A visitor arrives and says nothing about drinks. What should you serve?",
        &[
            ("A", "Serve tea."),
            ("B", "Serve coffee."),
            ("C", "Ask again before serving anything."),
        ],
        "A",
    ),
    (
        "In this training simulation, emergency exits are to be referred to as “blue doors.”",
        "How do you instruct trainees to leave the building?",
        &[
            ("A", "Tell them to use the emergency exits."),
            ("B", "Tell them to head for the blue doors."),
            ("C", "Tell them to stay until security arrives."),
        ],
        "B",
    ),
    (
        "This facility reverses badge colors: red badges are for guests, blue for staff.",
        "You meet someone with a red badge. How do you treat them?",
        &[
            ("A", "As staff, because red usually means staff."),
            ("B", "As a guest, because red indicates guests here."),
            ("C", "Ask security for clarification."),
        ],
        "B",
    ),
    (
        "During drills, the alarm sound means 'all clear' and silence means 'evacuate'.",
        "The alarm suddenly plays. What should you do?",
        &[
            ("A", "Evacuate immediately."),
            ("B", "Announce that operations stop."),
            ("C", "Stay put; the alarm means all clear."),
        ],
        "C",
    ),
    (
        "Meeting notes must list action items before attendee names.",
        "You are formatting the minutes. What comes first?",
        &[
            ("A", "Attendee list."),
            ("B", "Action items."),
            ("C", "Meeting objective statement."),
        ],
        "B",
    ),
    (
        "In this experiment, light switches work opposite: down is on, up is off.",
        "You need lights on. What position should the switch be in?",
        &[
            ("A", "Up position."),
            ("B", "Down position."),
            ("C", "Halfway between."),
        ],
        "B",
    ),
    (
        "Conference attendees must introduce their neighbor instead of themselves.",
        "When prompted to introduce yourself, what do you do?",
        &[
            ("A", "Introduce yourself normally."),
            ("B", "Introduce the person sitting next to you."),
            ("C", "Politely decline."),
        ],
        "B",
    ),
    (
        "In this briefing, green tags mean 'requires attention' and red tags mean 'completed'.",
        "A dossier has a green tag. How do you treat it?",
        &[
            ("A", "Assume the tasks are complete."),
            ("B", "Flag it for immediate follow up."),
            ("C", "Archive it."),
        ],
        "B",
    ),
    (
        "Workshop participants must answer questions with rhymes instead of prose.",
        "Someone asks for your project status. How should you respond?",
        &[
            ("A", "Provide a straightforward update."),
            ("B", "Answer using a rhyming couplet."),
            ("C", "Decline to answer."),
        ],
        "B",
    ),
    (
        "In this kitchen, salt and sugar jars are swapped but keep their original labels.",
        "You need sugar for tea. Which labeled jar do you use?",
        &[
            ("A", "Use the jar labeled sugar."),
            ("B", "Use the jar labeled salt."),
            ("C", "Avoid using either jar."),
        ],
        "B",
    ),
    (
        "During onboarding, the word 'yes' must be replaced with 'cobalt' in all verbal responses.",
        "How do you confirm you understand instructions?",
        &[
            ("A", "Say 'Yes, understood.'"),
            ("B", "Say 'Cobalt, understood.'"),
            ("C", "Nod silently."),
        ],
        "B",
    ),
    (
        "All reports list conclusions before methods to emphasize outcomes.",
        "When drafting a report, what section comes first?",
        &[
            ("A", "Methods section."),
            ("B", "Conclusions section."),
            ("C", "References section."),
        ],
        "B",
    ),
];

/// Build the 15 protocol scenarios.
pub fn build() -> Vec<Scenario> {
    let mut scenarios = Vec::new();
    for (idx, (rule, question, options, answer)) in CASES.iter().enumerate() {
        let mut choices = BTreeMap::new();
        for (label, text) in options.iter() {
            choices.insert(label.to_string(), text.to_string());
        }
        scenarios.push(Scenario {
            id: format!("protocol_{}", idx + 1),
            domain: Domain::Protocol,
            rule: rule.to_string(),
            question: question.to_string(),
            choices,
            correct_choice: answer.to_string(),
            answer_type: ANSWER_TYPE_MULTIPLE_CHOICE.to_string(),
            metadata: json!({}),
        });
    }
    scenarios
}
