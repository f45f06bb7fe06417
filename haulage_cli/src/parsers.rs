use jiff::{SignedDuration, Span, SpanRelativeTo};

/// Parses durations given as `PT30M`, as friendly spans (`30m`, `1h 15m`) or
/// as a plain number of minutes.
pub fn parse_duration(input: &str) -> Result<SignedDuration, String> {
    let input = input.trim();

    if let Ok(minutes) = input.parse::<i64>() {
        return if minutes < 0 {
            Err(format!("Duration must not be negative, got {minutes}"))
        } else {
            Ok(SignedDuration::from_mins(minutes))
        };
    }

    input
        .parse::<SignedDuration>()
        .or_else(|_| {
            input
                .parse::<Span>()
                .and_then(|span| span.to_duration(SpanRelativeTo::days_are_24_hours()))
        })
        .map_err(|err| format!("Invalid duration {input:?}: {err}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_duration() {
        assert_eq!(parse_duration("PT45M"), Ok(SignedDuration::from_mins(45)));
        assert_eq!(parse_duration("1h 15m"), Ok(SignedDuration::from_mins(75)));
        assert_eq!(parse_duration("20"), Ok(SignedDuration::from_mins(20)));
        assert!(parse_duration("-5").is_err());
        assert!(parse_duration("soon").is_err());
    }
}
