use rand::Rng;

/// Per-dispatch values available to placeholders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemplateVars {
    pub user: usize,
    pub iteration: u64,
    pub timestamp_ms: i64,
}

pub(super) fn has_placeholder(input: &str) -> bool {
    input
        .find("{{")
        .and_then(|start| input.get(start..))
        .is_some_and(|rest| rest.contains("}}"))
}

/// Replaces `{{user}}`, `{{iteration}}`, `{{timestamp_ms}}` and
/// `{{rand:MIN-MAX}}`. Anything else between braces is kept as written.
pub fn render_template<R: Rng + ?Sized>(input: &str, vars: &TemplateVars, rng: &mut R) -> String {
    let mut rest = input;
    let mut output = String::with_capacity(input.len());

    loop {
        let Some(start) = rest.find("{{") else {
            output.push_str(rest);
            break;
        };
        let (before, after_start) = rest.split_at(start);
        output.push_str(before);
        let Some(after) = after_start.strip_prefix("{{") else {
            output.push_str(after_start);
            break;
        };
        let Some(end) = after.find("}}") else {
            output.push_str("{{");
            output.push_str(after);
            break;
        };
        let (key_part, after_end) = after.split_at(end);
        let key = key_part.trim();
        if let Some(value) = resolve_placeholder(key, vars, rng) {
            output.push_str(&value);
        } else {
            output.push_str("{{");
            output.push_str(key_part);
            output.push_str("}}");
        }
        rest = match after_end.strip_prefix("}}") {
            Some(remaining) => remaining,
            None => {
                output.push_str(after_end);
                break;
            }
        };
    }

    output
}

fn resolve_placeholder<R: Rng + ?Sized>(
    key: &str,
    vars: &TemplateVars,
    rng: &mut R,
) -> Option<String> {
    match key {
        "user" => Some(vars.user.to_string()),
        "iteration" => Some(vars.iteration.to_string()),
        "timestamp_ms" => Some(vars.timestamp_ms.to_string()),
        _ => {
            let range = key.strip_prefix("rand:")?;
            let (min, max) = parse_rand_range(range)?;
            Some(rng.gen_range(min..=max).to_string())
        }
    }
}

fn parse_rand_range(range: &str) -> Option<(i64, i64)> {
    let (min, max) = range.split_once('-')?;
    let min: i64 = min.trim().parse().ok()?;
    let max: i64 = max.trim().parse().ok()?;
    if min > max {
        return None;
    }
    Some((min, max))
}
