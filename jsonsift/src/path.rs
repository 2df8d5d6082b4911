//! Dotted, optionally array-indexed field paths into JSON records,
//! e.g. `a.b[0].c`.

use serde_json::Value;

struct Segment<'a> {
    name: &'a str,
    index: Option<usize>,
}

/// Parse one `name` or `name[index]` segment. The name may not contain `[`
/// and the index must be a decimal non-negative integer; anything else is
/// rejected, which fails the whole resolution.
fn parse_segment(segment: &str) -> Option<Segment<'_>> {
    match segment.find('[') {
        None => {
            if segment.is_empty() {
                None
            } else {
                Some(Segment { name: segment, index: None })
            }
        }
        Some(open) => {
            let name = &segment[..open];
            let digits = segment[open + 1..].strip_suffix(']')?;
            if name.is_empty() || digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            let index = digits.parse().ok()?;
            Some(Segment { name, index: Some(index) })
        }
    }
}

/// Read the value at `path` inside `record`.
///
/// Resolution fails soft: a missing key, a malformed segment, descent through
/// null, and an out-of-range index all yield `None` rather than an error.
/// Two quirks are part of the contract:
/// - an index is applied only when the named value is an array; otherwise the
///   index is ignored and the named value stands
/// - a JSON `null` reached as the final value resolves successfully (null
///   exists; a missing field does not)
pub fn resolve<'a>(record: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = record;
    for raw in path.split('.') {
        let segment = parse_segment(raw)?;
        if current.is_null() {
            return None;
        }
        current = current.get(segment.name)?;
        if let Some(index) = segment.index {
            if let Value::Array(items) = current {
                current = items.get(index)?;
            }
        }
    }
    Some(current)
}
