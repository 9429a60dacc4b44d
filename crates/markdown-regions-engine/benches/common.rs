// Benchmark helper functions - Rust's dead code analysis doesn't understand
// that these are used by benchmark files in the same directory
#[allow(dead_code)]
pub fn generate_numbered_lists(lists: usize, items: usize) -> String {
    let mut content = String::new();

    for list in 0..lists {
        content.push_str(&format!("## List {}\n\n", list));
        for item in 0..items {
            // Wrong ordinals on purpose so every item gets rewritten
            content.push_str(&format!("{}. Item {}\n", item * 3 + 7, item));
            if item % 4 == 0 {
                content.push_str("\t9. Nested detail\n\t9. Another detail\n");
            }
        }
        content.push('\n');
    }

    content
}

#[allow(dead_code)]
pub fn generate_prose(paragraphs: usize) -> String {
    let base = "Some paragraph with **bold** and `code` spans.\nA second line of prose.\n\n";
    base.repeat(paragraphs)
}
