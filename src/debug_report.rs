use colloquy::{Engine, MatchOutcome, SubQuery, UserStatementResponse};

mod ansi {
    pub const RESET: &str = "\x1b[0m";
    pub const DIM: &str = "\x1b[2m";
    pub const BOLD: &str = "\x1b[1m";

    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const BLUE: &str = "\x1b[34m";
    pub const RED: &str = "\x1b[31m";
    pub const CYAN: &str = "\x1b[36m";
    pub const GRAY: &str = "\x1b[90m";

    pub struct Palette {
        enabled: bool,
    }

    impl Palette {
        pub fn new(enabled: bool) -> Self {
            Self { enabled }
        }

        pub fn paint(&self, s: impl AsRef<str>, color: &str) -> String {
            if self.enabled { format!("{}{}{}", color, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }

        pub fn bold(&self, s: impl AsRef<str>) -> String {
            if self.enabled { format!("{}{}{}", BOLD, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }

        pub fn dim(&self, s: impl AsRef<str>) -> String {
            if self.enabled { format!("{}{}{}", DIM, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }
    }
}

pub fn print_run(engine: &Engine, out: &UserStatementResponse, color: bool) {
    let palette = ansi::Palette::new(color);
    println!("\n{}", palette.bold(palette.paint(format!("💬 Statement: \"{}\"", out.raw_input), ansi::CYAN)));

    println!("\n{}", palette.paint("━━━ Normalization ━━━", ansi::GRAY));
    let trace = engine.pipeline().normalize_traced(&out.raw_input);
    println!("  {} {}", palette.dim("sanitized:  "), trace.sanitized);
    println!("  {} {}", palette.dim("substituted:"), trace.substituted);
    println!("  {} {}", palette.dim("folded:     "), palette.bold(&trace.folded));

    println!("\n{}", palette.paint("━━━ Sentences ━━━", ansi::GRAY));
    for (idx, sq) in out.sub_queries.iter().enumerate() {
        print_sub_query(idx, sq, &palette);
    }

    println!("\n{}", palette.paint("━━━ Response ━━━", ansi::GRAY));
    println!("  {}", palette.bold(palette.paint(&out.text, ansi::GREEN)));

    println!("\n{}", palette.paint("━━━ Timing ━━━", ansi::GRAY));
    println!(
        "  Total: {}  │  Normalize: {}  │  Resolve: {}  │  History: {} entries",
        palette.paint(format!("{:?}", out.metrics.total), ansi::GREEN),
        palette.paint(format!("{:?}", out.metrics.normalize), ansi::CYAN),
        palette.dim(format!("{:?}", out.metrics.resolve)),
        engine.history().len(),
    );
    println!();
}

fn print_sub_query(idx: usize, sq: &SubQuery, palette: &ansi::Palette) {
    let outcome = match sq.outcome() {
        MatchOutcome::Matched => palette.paint("✓ matched", ansi::GREEN),
        MatchOutcome::Unmatched => palette.paint("✗ fallback", ansi::YELLOW),
        MatchOutcome::GuardExceeded => palette.paint("⚠ guard exceeded", ansi::RED),
    };
    println!(
        "  {} {} {} {}",
        palette.paint(format!("[{}]", idx), ansi::GRAY),
        palette.bold(format!("\"{}\"", sq.input_text())),
        palette.dim("│"),
        outcome,
    );
    println!(
        "      {} {}  {} {}",
        palette.dim("pattern:"),
        palette.paint(sq.template().pattern(), ansi::BLUE),
        palette.dim("│ steps:"),
        palette.paint(sq.metrics().steps.to_string(), ansi::YELLOW),
    );
    if !sq.captures().is_empty() {
        println!("      {} {}", palette.dim("captures:"), palette.paint(sq.captures().join(" | "), ansi::CYAN));
    }
    println!("      {} {}", palette.dim("response:"), sq.response());
}
