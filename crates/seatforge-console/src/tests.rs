use super::*;

fn plain(s: &str) -> String {
    let mut out = String::new();
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c == '\u{1b}' {
            for c in chars.by_ref() {
                if c == 'm' {
                    break;
                }
            }
        } else {
            out.push(c);
        }
    }
    out
}

#[test]
fn test_duration_formatting() {
    assert_eq!(format_duration_ms(250), "250ms");
    assert_eq!(format_duration_ms(1_500), "1.50s");
    assert_eq!(format_duration_ms(125_000), "2m 5s");
}

#[test]
fn test_feasibility_from_score() {
    assert!(is_feasible("0hard/-2medium/0.7500soft"));
    assert!(!is_feasible("-1hard/0medium/1.0000soft"));
    assert!(!is_feasible("N/A"));
}

#[test]
fn test_score_keeps_text() {
    let score = "-1hard/0medium/0.5000soft";
    assert_eq!(plain(&format_score(score)), score);
    assert_eq!(plain(&format_score("N/A")), "N/A");
}

#[test]
fn test_run_end_line() {
    let visitor = EventVisitor {
        event: Some("solve_end".into()),
        status: Some("CONVERGED".into()),
        score: Some("0hard/-1medium/1.0000soft".into()),
        assigned: Some(1_200),
        unassigned: Some(1),
        iterations: Some(3_000),
        ..EventVisitor::default()
    };
    let line = plain(&format_event(&visitor, Level::INFO));
    assert!(line.contains("CONVERGED"));
    assert!(line.contains("1,200 seated"));
    assert!(line.contains("1 unseated"));
    assert!(line.contains("3,000 iterations"));
    assert!(line.contains("FEASIBLE"));
}

#[test]
fn test_moves_only_at_trace() {
    let visitor = EventVisitor {
        event: Some("move".into()),
        candidate: Some("swap #0 <-> #1".into()),
        accepted: Some(true),
        ..EventVisitor::default()
    };
    assert!(format_event(&visitor, Level::DEBUG).is_empty());
    assert!(plain(&format_event(&visitor, Level::TRACE)).contains("swap #0 <-> #1"));
}

#[test]
fn test_unknown_info_event_is_silent() {
    let visitor = EventVisitor {
        event: Some("record_skipped".into()),
        ..EventVisitor::default()
    };
    assert!(format_event(&visitor, Level::DEBUG).is_empty());
    let warned = plain(&format_event(&visitor, Level::WARN));
    assert!(warned.contains("record_skipped"));
}
