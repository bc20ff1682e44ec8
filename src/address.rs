//! Inbound message addressing
//!
//! Classifies a line from a registered client into an [`AddressIntent`].
//! Multicast is checked before direct because its `>>>` marker would
//! otherwise be picked up by the `>>` rule.

/// How an inbound chat line should be routed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddressIntent {
    /// Everyone currently registered, sender included
    Broadcast(String),
    /// One named recipient (plus an echo to the sender)
    Direct { target: String, text: String },
    /// An explicit recipient list (plus exactly one echo to the sender)
    Multicast { targets: Vec<String>, text: String },
}

/// Classify one inbound line.
///
/// Grammar, in precedence order:
/// 1. `[name1, name2]>>>payload` — multicast; names split on `", "`.
/// 2. `name>>payload` — direct; the first `>>` that is not part of a `>>>`
///    marker splits target from payload.
/// 3. anything else — broadcast of the whole line. Lines carrying `>>>`
///    without the bracketed multicast shape fall through to here.
pub fn resolve(line: &str) -> AddressIntent {
    if let Some(intent) = parse_multicast(line) {
        return intent;
    }
    if let Some(intent) = parse_direct(line) {
        return intent;
    }
    AddressIntent::Broadcast(line.to_string())
}

fn parse_multicast(line: &str) -> Option<AddressIntent> {
    let rest = line.strip_prefix('[')?;
    let (inside, payload) = rest.split_once("]>>>")?;
    let targets = if inside.is_empty() {
        Vec::new()
    } else {
        inside.split(", ").map(str::to_string).collect()
    };
    Some(AddressIntent::Multicast {
        targets,
        text: payload.to_string(),
    })
}

fn parse_direct(line: &str) -> Option<AddressIntent> {
    let (target, payload) = line.split_once(">>")?;
    // A third '>' means this was a multicast marker that failed rule 1.
    if payload.starts_with('>') {
        return None;
    }
    Some(AddressIntent::Direct {
        target: target.to_string(),
        text: payload.to_string(),
    })
}
