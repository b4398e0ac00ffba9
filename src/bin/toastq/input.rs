use toastq::ToastData;

/// One line of stdin, decoded.
#[derive(Debug, PartialEq, Eq)]
pub enum Command {
    Create(ToastData),
    Close(u64),
    Remove(u64),
    Clear,
}

/// Decode `title|body[|variant]` or a slash command. Blank lines yield `None`.
///
/// A title ending in `!` marks the toast as sticky (no autohide).
pub fn parse_line(line: &str) -> Result<Option<Command>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    if let Some(rest) = line.strip_prefix('/') {
        let mut parts = rest.split_whitespace();
        let verb = parts.next().unwrap_or_default();
        return match verb {
            "clear" => Ok(Some(Command::Clear)),
            "close" | "remove" => {
                let raw = parts
                    .next()
                    .ok_or_else(|| format!("/{verb} expects a toast id"))?;
                let id = raw
                    .trim_start_matches('#')
                    .parse::<u64>()
                    .map_err(|err| format!("invalid toast id {raw:?}: {err}"))?;
                Ok(Some(if verb == "close" {
                    Command::Close(id)
                } else {
                    Command::Remove(id)
                }))
            }
            other => Err(format!("unknown command: /{other}")),
        };
    }

    let mut fields = line.splitn(3, '|').map(str::trim);
    let title = fields.next().unwrap_or_default();
    let body = fields
        .next()
        .ok_or_else(|| "expected `title|body[|variant]`".to_string())?;

    let (title, sticky) = title
        .strip_suffix('!')
        .map_or((title, false), |t| (t.trim_end(), true));
    let mut data = ToastData::new(title, body);
    if sticky {
        data = data.autohide(false);
    }
    if let Some(variant) = fields.next().filter(|v| !v.is_empty()) {
        data = data.variant(variant);
    }
    Ok(Some(Command::Create(data)))
}

#[cfg(test)]
mod tests {
    use super::{Command, parse_line};
    use toastq::ToastData;

    #[test]
    fn parses_basic_toast() {
        assert_eq!(
            parse_line("Saved | profile updated"),
            Ok(Some(Command::Create(ToastData::new("Saved", "profile updated"))))
        );
    }

    #[test]
    fn parses_sticky_toast_with_variant() {
        assert_eq!(
            parse_line("Disk full!|cleanup needed|danger"),
            Ok(Some(Command::Create(
                ToastData::new("Disk full", "cleanup needed")
                    .autohide(false)
                    .variant("danger")
            )))
        );
    }

    #[test]
    fn parses_commands() {
        assert_eq!(parse_line("/close 3"), Ok(Some(Command::Close(3))));
        assert_eq!(parse_line("/remove #12"), Ok(Some(Command::Remove(12))));
        assert_eq!(parse_line("/clear"), Ok(Some(Command::Clear)));
        assert_eq!(parse_line("   "), Ok(None));
    }

    #[test]
    fn rejects_malformed_lines() {
        assert!(parse_line("no body here").is_err());
        assert!(parse_line("/close").is_err());
        assert!(parse_line("/close abc").is_err());
        assert!(parse_line("/explode").is_err());
    }
}
