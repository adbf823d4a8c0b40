// Benchmark helper functions - Rust's dead code analysis doesn't understand
// that these are used by benchmark files in the same directory
// See: https://users.rust-lang.org/t/cargo-rustc-benches-awarnings/110111/2
#[allow(dead_code)]
pub fn generate_page_content(size: usize) -> String {
    let base = "# Title\n\n## Section\n\nRun `cargo build --release --locked` or just `cargo b`.\n\n- Bullet point with `short`\n- Another item\n\n```rust\nfn example() {\n    println!(\"Hello\");\n}\n```\n\n> Quoted line with `inline` code.\n\n";
    base.repeat(size)
}

#[allow(dead_code)]
pub fn generate_code_heavy_page(spans: usize) -> String {
    let mut content = String::from("# Flags\n\n");

    for span in 0..spans {
        // Alternate around the long-code threshold.
        if span % 2 == 0 {
            content.push_str(&format!("Use `--flag-{span}` here. "));
        } else {
            content.push_str(&format!(
                "Use `--very-long-option-name-{span}` instead. "
            ));
        }
        if span % 8 == 7 {
            content.push_str("\n\n");
        }
    }

    content
}
