//! Built-in fallback conversation.
//!
//! Used only when the dialog directory yields zero nodes, so the game is
//! playable with no content files at all. The tree must stay structurally
//! valid: a root with at least one choice, every target present, and an
//! explicit end node.

use crate::shared::*;

/// Installs the default resident's tree into the library and registers
/// its root.
pub fn build_fallback_dialog(library: &mut DialogLibrary) {
    let cid = DEFAULT_RESIDENT_ID;

    let mut greeting = DialogNode::new(
        format!("{cid}_greeting"),
        "Mara",
        "Oh, you're the locksmith? Thank you for coming so quickly!",
        "happy",
    );
    greeting.choices.push(DialogChoice::new(
        "No problem, happy to help.",
        format!("{cid}_friendly"),
        5.0,
        2.0,
    ));
    greeting.choices.push(DialogChoice::new(
        "It's my job. Let's get started.",
        format!("{cid}_professional"),
        3.0,
        0.0,
    ));
    greeting.choices.push(DialogChoice::new(
        "Anything for a face like yours.",
        format!("{cid}_flirty"),
        -2.0,
        5.0,
    ));

    let mut friendly = DialogNode::new(
        format!("{cid}_friendly"),
        "Mara",
        "You seem like a nice person! I was really worried about this lock.",
        "happy",
    );
    friendly.choices.push(DialogChoice::new(
        "Don't worry, I'll have it open in no time.",
        format!("{cid}_work"),
        3.0,
        0.0,
    ));

    let mut professional = DialogNode::new(
        format!("{cid}_professional"),
        "Mara",
        "Of course. The lock is right here. I appreciate your help.",
        "neutral",
    );
    professional.choices.push(DialogChoice::new(
        "Let me take a look at it.",
        format!("{cid}_work"),
        2.0,
        0.0,
    ));

    let mut flirty = DialogNode::new(
        format!("{cid}_flirty"),
        "Mara",
        "Oh... um, thank you. Should we focus on the lock?",
        "flirty",
    );
    flirty.choices.push(DialogChoice::new(
        "You're right, sorry. Let me get to work.",
        format!("{cid}_work"),
        1.0,
        2.0,
    ));
    flirty.choices.push(DialogChoice::new(
        "Of course. But I meant it.",
        format!("{cid}_bold"),
        -3.0,
        8.0,
    ));

    let mut bold = DialogNode::new(
        format!("{cid}_bold"),
        "Mara",
        "You're quite forward... Let's see if you're as good with locks as you are with words.",
        "flirty",
    );
    bold.choices.push(DialogChoice::new(
        "I'm good with my hands in general.",
        format!("{cid}_work"),
        0.0,
        5.0,
    ));

    let mut work = DialogNode::new(
        format!("{cid}_work"),
        "Mara",
        "Alright, I'll let you work. Just call me if you need anything!",
        "happy",
    );
    work.is_end_node = true;

    for node in [greeting, friendly, professional, flirty, bold, work] {
        library.nodes.insert(node.id.clone(), node);
    }
    library
        .roots
        .insert(cid.to_string(), format!("{cid}_greeting"));
}
