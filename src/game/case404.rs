use std::collections::HashMap;

use crate::game::node::{Approach, DialogueNode, NodeResult, Outcome};
use crate::game::script::{
    CaseFile, EvidenceItem, Script, ScriptStore, Suspect, ROOT_NODE_ID, SHUTDOWN_NODE_ID,
};

// ---------------------------------------------------------------------------
// Builders
// ---------------------------------------------------------------------------

fn says(query: &str, text: &str, damage: i32, stress: i32, next: &str) -> Outcome {
    Outcome {
        query: Some(query.into()),
        text: Some(text.into()),
        damage,
        stress,
        next: Some(next.into()),
        unlock: None,
    }
}

fn line(text: &str) -> DialogueNode {
    DialogueNode {
        text: text.into(),
        ..Default::default()
    }
}

fn with(mut node: DialogueNode, approach: Approach, outcome: Outcome) -> DialogueNode {
    node.approaches.insert(approach, outcome);
    node
}

fn shown(mut node: DialogueNode, evidence_id: &str, outcome: Outcome) -> DialogueNode {
    node.evidence.insert(evidence_id.into(), outcome);
    node
}

fn ending(text: &str, reward: &str) -> DialogueNode {
    DialogueNode {
        text: text.into(),
        is_end: true,
        reward_text: Some(reward.into()),
        ..Default::default()
    }
}

fn shutdown(text: &str) -> DialogueNode {
    DialogueNode {
        text: text.into(),
        is_end: true,
        result: Some(NodeResult::Strike),
        ..Default::default()
    }
}

fn script(nodes: Vec<(&str, DialogueNode)>) -> Script {
    Script {
        nodes: nodes
            .into_iter()
            .map(|(id, node)| (id.to_string(), node))
            .collect(),
    }
}

// ---------------------------------------------------------------------------
// Case File 404: murder at Norresken Resorts
// ---------------------------------------------------------------------------

pub fn case_404() -> ScriptStore {
    let suspects = vec![
        suspect("beatrice", "Beatrice", "Head Housekeeper"),
        suspect("jean", "Officer Jean", "Night Security"),
        suspect("bizimana", "Mr. Bizimana", "Resort Manager"),
        suspect("elena", "Elena Vance", "Penthouse Guest"),
    ];

    let mut scripts = HashMap::new();
    scripts.insert("beatrice".to_string(), beatrice());
    scripts.insert("jean".to_string(), jean());
    scripts.insert("bizimana".to_string(), bizimana());
    scripts.insert("elena".to_string(), elena());

    let starter_evidence = vec![
        EvidenceItem::new(
            "key_log",
            "Keycard Log",
            "Door access records for the night of the murder.",
        ),
        EvidenceItem::new(
            "wrapper",
            "Chocolate Wrapper",
            "Gold foil from an imported truffle, found beside the body.",
        ),
        EvidenceItem::new(
            "autopsy",
            "Autopsy Report",
            "Blunt force trauma. Time of death between 1:00 and 1:30 am.",
        ),
    ];

    let mut unlocks = HashMap::new();
    unlocks.insert(
        "knows_cctv".to_string(),
        EvidenceItem::new(
            "cctv_still",
            "CCTV Backup Still",
            "A woman in a red coat leaving Silas's suite at 1:20 am.",
        ),
    );
    unlocks.insert(
        "knows_penthouse".to_string(),
        EvidenceItem::new(
            "room_service_slip",
            "Room Service Slip",
            "Penthouse order delivered to Silas's floor at 1:00 am, signed E.V.",
        ),
    );

    ScriptStore {
        case: CaseFile {
            title: "CASE FILE: 404".into(),
            synopsis: "Murder at Norresken Resorts. A guest, Silas, was found dead. \
                       Only FOUR people had access to the crime scene."
                .into(),
        },
        suspects,
        scripts,
        starter_evidence,
        unlocks,
    }
}

fn suspect(id: &str, name: &str, role: &str) -> Suspect {
    Suspect {
        id: id.into(),
        name: name.into(),
        role: role.into(),
    }
}

fn beatrice() -> Script {
    let root = line("I only clean the rooms, detective. I saw nothing.");
    let root = with(
        root,
        Approach::Probe,
        says(
            "Walk me through your shift.",
            "Linens at ten, turndown at eleven, then home. Same as every night.",
            10,
            5,
            ROOT_NODE_ID,
        ),
    );
    let root = with(
        root,
        Approach::Pry,
        says(
            "Your master key opened three guest rooms after midnight. Why?",
            "I... I took a few things. Small things! Jewelry the guests never miss.",
            30,
            30,
            "beatrice_theft",
        ),
    );
    let root = with(
        root,
        Approach::Provoke,
        says(
            "A maid with a master key. How convenient.",
            "How dare you! Eleven years I have worked here!",
            0,
            45,
            "beatrice_angry",
        ),
    );

    let angry = line("I will not be spoken to like a criminal.");
    let angry = with(
        angry,
        Approach::Probe,
        says(
            "I'm sorry. Let's start again.",
            "...Fine. Ask your questions.",
            5,
            -20,
            ROOT_NODE_ID,
        ),
    );
    let angry = with(
        angry,
        Approach::Provoke,
        says(
            "Thieves always say that.",
            "That's it. I want a lawyer.",
            0,
            60,
            SHUTDOWN_NODE_ID,
        ),
    );

    let theft = line("Please don't tell Mr. Bizimana. I'll give it all back.");
    let theft = with(
        theft,
        Approach::Probe,
        says(
            "What else did you see while you were in those rooms?",
            "A woman in a red coat, coming out of Silas's suite after one. I hid in the linen closet.",
            100,
            10,
            "beatrice_confess",
        ),
    );
    let theft = with(
        theft,
        Approach::Provoke,
        says(
            "You'll hang for more than jewelry.",
            "I didn't kill anyone! I'm not saying another word!",
            0,
            70,
            SHUTDOWN_NODE_ID,
        ),
    );

    let mut confess = ending(
        "That's everything. The red coat. I'd know it anywhere.",
        "NEW LEAD: A woman in a red coat left the victim's suite after 1 am.",
    );
    confess.unlock = Some("knows_red_coat".into());

    script(vec![
        (ROOT_NODE_ID, root),
        ("beatrice_angry", angry),
        ("beatrice_theft", theft),
        ("beatrice_confess", confess),
        (SHUTDOWN_NODE_ID, shutdown("Beatrice stares at the wall. She is done talking.")),
    ])
}

fn jean() -> Script {
    let to_cameras = says(
        "The key log shows your card opened the camera room at 1:10.",
        "Fine. I switched the cameras off for twenty minutes. A guest paid me to.",
        40,
        25,
        "jean_cameras",
    );

    // Root only reacts to the keycard log and to prying.
    let root = line("Officer Jean, night security. My rounds were clean.");
    let root = with(
        root,
        Approach::Pry,
        says(
            "Where were you between midnight and two?",
            "At my desk, watching the monitors. Where else would I be?",
            15,
            20,
            "jean_desk",
        ),
    );
    let root = shown(root, "key_log", to_cameras.clone());

    let desk = line("The monitors showed nothing. Quiet night.");
    let desk = with(
        desk,
        Approach::Probe,
        says(
            "Nothing at all?",
            "A few drunks by the pool. Nothing worth a report.",
            5,
            5,
            "jean_desk",
        ),
    );
    let desk = with(
        desk,
        Approach::Provoke,
        says(
            "Sleeping on the job, were you?",
            "I don't have to take this from you. We're done.",
            0,
            70,
            SHUTDOWN_NODE_ID,
        ),
    );
    let desk = shown(desk, "key_log", to_cameras);

    let cameras = line("Twenty minutes, that's all. I didn't ask questions.");
    let mut to_footage = says(
        "Which guest?",
        "I never saw her face. But the backup drive kept recording. Take it.",
        50,
        10,
        "jean_footage",
    );
    to_footage.unlock = Some("knows_cctv".into());
    let cameras = with(cameras, Approach::Probe, to_footage);
    let cameras = with(
        cameras,
        Approach::Provoke,
        says(
            "You're an accessory to murder.",
            "Murder? No. No, I'm calling my union rep.",
            0,
            80,
            SHUTDOWN_NODE_ID,
        ),
    );

    let footage = ending(
        "Whoever she is, she knew exactly when the cameras would be off.",
        "EVIDENCE ADDED: CCTV Backup Still",
    );

    script(vec![
        (ROOT_NODE_ID, root),
        ("jean_desk", desk),
        ("jean_cameras", cameras),
        ("jean_footage", footage),
        (SHUTDOWN_NODE_ID, shutdown("Jean folds his arms and says nothing more.")),
    ])
}

fn bizimana() -> Script {
    let to_penthouse = says(
        "This wrapper was next to the body.",
        "Swiss truffles. We stock those only in the penthouse suite.",
        45,
        15,
        "bizimana_penthouse",
    );

    let root = line("Silas was a valued guest. This is a tragedy for the resort.");
    let root = with(
        root,
        Approach::Probe,
        says(
            "How well did you know him?",
            "He stayed with us every winter. A generous man.",
            10,
            5,
            ROOT_NODE_ID,
        ),
    );
    let root = with(
        root,
        Approach::Pry,
        says(
            "Silas owed the resort money, didn't he?",
            "His accounts are not your concern, detective.",
            20,
            25,
            "bizimana_debts",
        ),
    );
    let root = shown(root, "wrapper", to_penthouse.clone());

    let debts = line("I have nothing further to say about finances.");
    let debts = with(
        debts,
        Approach::Probe,
        says(
            "Let's talk about something else, then.",
            "Thank you. Ask what you need.",
            10,
            -10,
            ROOT_NODE_ID,
        ),
    );
    let debts = with(
        debts,
        Approach::Provoke,
        says(
            "A dead debtor can't pay. Convenient for you.",
            "Get out of my office.",
            0,
            80,
            SHUTDOWN_NODE_ID,
        ),
    );
    let debts = shown(debts, "wrapper", to_penthouse);

    let penthouse = line("The penthouse guests are very private people.");
    let mut to_ledger = says(
        "Who is staying in the penthouse?",
        "Ms. Elena Vance. She ordered room service to Silas's floor at one.",
        45,
        10,
        "bizimana_ledger",
    );
    to_ledger.unlock = Some("knows_penthouse".into());
    let penthouse = with(penthouse, Approach::Probe, to_ledger);

    let ledger = ending(
        "Here. The slip, signed by her own hand.",
        "EVIDENCE ADDED: Room Service Slip",
    );

    script(vec![
        (ROOT_NODE_ID, root),
        ("bizimana_debts", debts),
        ("bizimana_penthouse", penthouse),
        ("bizimana_ledger", ledger),
        (SHUTDOWN_NODE_ID, shutdown("Mr. Bizimana calls the resort's lawyers.")),
    ])
}

fn elena() -> Script {
    let to_cornered = says(
        "This is you, in a red coat, leaving Silas's suite at 1:20.",
        "A coat like that could belong to anyone.",
        35,
        30,
        "elena_cornered",
    );

    let root = line("Elena Vance. I was asleep by midnight, detective.");
    let root = with(
        root,
        Approach::Probe,
        says(
            "Did you know the victim?",
            "We'd met. At dinners. He was charming, in his way.",
            5,
            5,
            ROOT_NODE_ID,
        ),
    );
    let root = with(
        root,
        Approach::Pry,
        says(
            "Can anyone confirm you were asleep?",
            "I sleep alone, detective. Is that a crime now?",
            10,
            20,
            "elena_alibi",
        ),
    );
    let root = with(
        root,
        Approach::Provoke,
        says(
            "Rich people think they can get away with anything.",
            "And poor detectives think insults are evidence.",
            0,
            40,
            "elena_cold",
        ),
    );
    let root = shown(root, "cctv_still", to_cornered.clone());

    let alibi = line("My alibi is my word. That should be enough.");
    let alibi = with(
        alibi,
        Approach::Probe,
        says(
            "Of course. Let's move on.",
            "Thank you.",
            0,
            -10,
            ROOT_NODE_ID,
        ),
    );
    let alibi = with(
        alibi,
        Approach::Provoke,
        says(
            "Your word isn't worth much.",
            "This conversation is over.",
            0,
            80,
            SHUTDOWN_NODE_ID,
        ),
    );
    let alibi = shown(alibi, "cctv_still", to_cornered.clone());

    let cold = line("Elena regards you with polite contempt.");
    let cold = with(
        cold,
        Approach::Probe,
        says(
            "Let's keep this civil.",
            "Civil. Yes. Let's.",
            0,
            -20,
            ROOT_NODE_ID,
        ),
    );
    let cold = with(
        cold,
        Approach::Provoke,
        says(
            "You killed him, didn't you?",
            "Speak to my lawyer.",
            0,
            70,
            SHUTDOWN_NODE_ID,
        ),
    );
    let cold = shown(cold, "cctv_still", to_cornered);

    let cornered = line("You have a blurry picture. That proves nothing.");
    let cornered = shown(
        cornered,
        "room_service_slip",
        says(
            "And this slip, signed in your hand, delivered to his floor at one.",
            "He was going to ruin me! I only meant to talk, and then...",
            100,
            30,
            "elena_unmasked",
        ),
    );
    let cornered = with(
        cornered,
        Approach::Provoke,
        says(
            "Just confess.",
            "To what? I'm leaving.",
            0,
            80,
            SHUTDOWN_NODE_ID,
        ),
    );

    let unmasked = DialogueNode {
        text: "The mask falls. Elena Vance killed Silas.".into(),
        is_end: true,
        result: Some(NodeResult::Victory),
        reward_text: Some("CASE CLOSED".into()),
        ..Default::default()
    };

    script(vec![
        (ROOT_NODE_ID, root),
        ("elena_alibi", alibi),
        ("elena_cold", cold),
        ("elena_cornered", cornered),
        ("elena_unmasked", unmasked),
        (SHUTDOWN_NODE_ID, shutdown("Elena rises and walks out.")),
    ])
}
