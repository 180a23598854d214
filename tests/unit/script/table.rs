use super::*;

#[test]
fn annotate_numbers_every_line_from_one() {
    assert_eq!(annotate_line_numbers("a\nb"), "1: a\n2: b");
    assert_eq!(annotate_line_numbers("x"), "1: x");
}

#[test]
fn fenced_table_with_header_parses_to_zero_based_ranges() {
    let out = "```csv\nstart_line_number|end_line_number|description_of_the_block\n1|5|\"Here we load the data\"\n23|23|'Class weights live here'\n```";
    let parsed = parse_highlight_table(out);
    assert_eq!(
        parsed,
        vec![
            HighlightSegment::new("Here we load the data", 0, 5),
            HighlightSegment::new("Class weights live here", 22, 1),
        ]
    );
}

#[test]
fn bare_rows_parse_without_fence_or_header() {
    let parsed = parse_highlight_table("3|4|Two lines");
    assert_eq!(parsed, vec![HighlightSegment::new("Two lines", 2, 2)]);
}

#[test]
fn malformed_rows_are_skipped() {
    let out = "1|2|\"ok\"\nnot a row\nx|3|\"bad start\"\n5|4|\"reversed\"\n0|1|\"zero\"\n7|7|\n\n9|9|\"also ok\"";
    let parsed = parse_highlight_table(out);
    assert_eq!(
        parsed,
        vec![
            HighlightSegment::new("ok", 0, 2),
            HighlightSegment::new("also ok", 8, 1),
        ]
    );
}

#[test]
fn pipes_inside_descriptions_are_kept() {
    let parsed = parse_highlight_table("2|2|\"a | b\"");
    assert_eq!(parsed[0].text, "a | b");
}
