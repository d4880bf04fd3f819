use crate::engine::{EntryFlags, MatchOutcome};
use crate::{Engine, MatchLimits, Options, SettingsDictionary, substitute};

fn engine() -> Engine {
    Engine::builder()
        .substitution("u", "you")
        .substitution("what's", "what is")
        .categories(categories![
            "HI" => "Hello!",
            "HELLO *" => "wild",
            "HELLO WORLD" => "exact",
            "A * C" => "<star/>",
            "NAME" => "Ada.",
            "RANK" => "Captain.",
            "SERIAL NUMBER" => "42.",
            "WHAT IS _" => "Nobody knows what <star/> is.",
            "HOW ARE YOU" => "Fine.",
        ])
        .build()
        .unwrap()
}

#[test]
fn end_to_end_statements() {
    // (input, expected response)
    let cases: Vec<(&str, &str)> = vec![
        ("Hi", "Hello!"),
        ("hi!", "Hello!"),
        ("  HI  ", "Hello!"),
        ("hello world", "exact"),
        ("Hello, big world", "wild"),
        ("a b b c", "B B"),
        ("what's love?", "Nobody knows what LOVE is."),
        ("how are u", "Fine."),
        ("Name. Rank. Serial Number", "Ada. Captain. 42."),
    ];

    let engine = engine();
    for (input, expected) in cases {
        let out = engine.handle_user_statement(input);
        assert_eq!(out.text, expected, "input: {input:?}");
        assert_eq!(out.raw_input, input);
    }
}

#[test]
fn hi_appends_exactly_two_history_entries() {
    let engine = engine();
    let before = engine.history().len();
    let out = engine.handle_user_statement("Hi");
    assert_eq!(out.text, "Hello!");
    assert_eq!(engine.history().len(), before + 2);

    let snapshot = engine.history().snapshot();
    let inbound = snapshot.get(before).unwrap();
    let generated = snapshot.get(before + 1).unwrap();
    assert!(inbound.flags().contains(EntryFlags::INBOUND));
    assert_eq!(inbound.text(), "Hi");
    assert_eq!(inbound.user(), "user");
    assert!(generated.flags().contains(EntryFlags::GENERATED));
    assert!(!generated.flags().contains(EntryFlags::FALLBACK));
    assert_eq!(generated.text(), "Hello!");
    assert_eq!(inbound.sub_queries().len(), 1);
    assert_eq!(generated.sub_queries()[0].response(), "Hello!");
}

#[test]
fn sentences_become_independent_sub_queries_in_order() {
    let engine = engine();
    let out = engine.handle_user_statement("Name. Rank. Serial Number");
    let inputs: Vec<&str> = out.sub_queries.iter().map(|sq| sq.input_text()).collect();
    assert_eq!(inputs, vec!["NAME", "RANK", "SERIAL NUMBER"]);
    assert!(out.sub_queries.iter().all(|sq| sq.outcome() == MatchOutcome::Matched));
}

#[test]
fn exact_category_wins_over_wildcard() {
    let engine = engine();
    let out = engine.handle_user_statement("HELLO WORLD");
    assert_eq!(out.sub_queries[0].template().pattern(), "HELLO WORLD");
}

#[test]
fn star_consumes_greedily() {
    let engine = engine();
    let out = engine.handle_user_statement("A B B C");
    assert_eq!(out.sub_queries[0].captures(), &["B B".to_string()]);
}

#[test]
fn unmatched_sentence_falls_back_without_failing_the_turn() {
    let engine = engine();
    let out = engine.handle_user_statement("Hi. Tell me a joke.");
    assert_eq!(out.sub_queries.len(), 2);
    assert_eq!(out.sub_queries[0].outcome(), MatchOutcome::Matched);
    assert_eq!(out.sub_queries[1].outcome(), MatchOutcome::Unmatched);
    assert_eq!(out.sub_queries[1].input_text(), "TELL ME A JOKE");
    assert_eq!(out.text, format!("Hello! {}", engine.options().fallback_template));

    let generated = engine.history().last().unwrap();
    assert!(generated.flags().contains(EntryFlags::FALLBACK));
}

#[test]
fn guard_trip_is_a_fallback_with_a_flag() {
    let options = Options { limits: MatchLimits { max_steps: 100, ..MatchLimits::default() }, ..Options::default() };
    let engine = Engine::builder().options(options).category("* * * * * * Z", "never").build().unwrap();

    let input = vec!["x"; 30].join(" ");
    let out = engine.handle_user_statement(&input);
    assert_eq!(out.sub_queries[0].outcome(), MatchOutcome::GuardExceeded);
    assert_eq!(out.text, engine.options().fallback_template);

    let flags = engine.history().last().unwrap().flags();
    assert!(flags.contains(EntryFlags::FALLBACK | EntryFlags::GUARD_TRIPPED));
}

#[test]
fn substitution_properties() {
    assert_eq!(substitute(Some(&SettingsDictionary::new()), "hi bob"), "hi bob");
    let dict: SettingsDictionary = [("BOB", "ROBERT")].into_iter().collect();
    assert_eq!(substitute(Some(&dict), "hi bob"), "hi ROBERT");
}

#[test]
fn normalizing_normalized_text_is_a_no_op() {
    let engine = engine();
    for input in ["what's up, u?", "Hello World!", "", "a.b.c", "tabs\tand\nnewlines"] {
        let once = engine.normalize(input);
        assert_eq!(engine.normalize(&once), once, "input: {input:?}");
    }
}

#[test]
fn users_are_recorded_per_call() {
    let engine = engine();
    engine.handle_user_statement_as("ada", "hi");
    let snapshot = engine.history().snapshot();
    assert!(snapshot.iter().all(|entry| entry.user() == "ada"));
}

#[test]
fn concurrent_statements_share_the_engine() {
    let engine = engine();
    std::thread::scope(|scope| {
        for t in 0..4 {
            let engine = &engine;
            scope.spawn(move || {
                for _ in 0..25 {
                    let out = engine.handle_user_statement_as(&format!("user-{t}"), "hello world");
                    assert_eq!(out.text, "exact");
                    // Explorer-style read while other threads append.
                    let snapshot = engine.history().snapshot();
                    assert_eq!(snapshot.len() % 2, 0);
                }
            });
        }
    });

    let snapshot = engine.history().snapshot();
    assert_eq!(snapshot.len(), 200);
    for pair in snapshot.iter().collect::<Vec<_>>().chunks(2) {
        assert!(pair[0].is_inbound());
        assert_eq!(pair[0].user(), pair[1].user());
    }
}
