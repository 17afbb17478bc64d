//! End-to-end scenarios (§8) driving the engine exactly as a caller would.

use pgen::config::Config;
use pgen::engine::Engine;
use std::collections::BTreeSet;

fn space_only_config() -> Config {
    let mut cfg = Config::default();
    cfg.delimiters = BTreeSet::from([b' ']);
    cfg
}

#[test]
fn scenario_repeated_word_collapses_to_single_fixed() {
    let cfg = space_only_config();
    let engine = Engine::new(&cfg).unwrap();
    let raw = "word\n".repeat(100);
    let artifacts = engine.run(&raw).unwrap();

    assert_eq!(artifacts.templates, vec!["word".to_string()]);
    assert!(artifacts.grammar_program.contains("FixedDataModelElement"));
    assert!(artifacts.grammar_program.contains("b'word'"));
}

#[test]
fn scenario_enumerable_words_become_wordlist() {
    let cfg = space_only_config();
    let engine = Engine::new(&cfg).unwrap();
    let mut raw = String::new();
    for word in ["this", "that", "those"] {
        for _ in 0..33 {
            raw.push_str(word);
            raw.push('\n');
        }
    }
    let artifacts = engine.run(&raw).unwrap();

    assert!(artifacts.grammar_program.contains("FixedWordlistDataModelElement"));
    assert!(artifacts.grammar_program.contains("b'those'"));
}

#[test]
fn scenario_integers_become_decimal_integer_element() {
    let cfg = space_only_config();
    let engine = Engine::new(&cfg).unwrap();
    let raw: String = (0..100).map(|n| format!("{}\n", n)).collect();
    let artifacts = engine.run(&raw).unwrap();

    assert!(artifacts.grammar_program.contains("DecimalIntegerValueModelElement"));
}

#[test]
fn scenario_ipv4_addresses_become_ipaddress_element() {
    let cfg = space_only_config();
    let engine = Engine::new(&cfg).unwrap();
    let raw: String = (0..100)
        .map(|n| format!("10.0.{}.{}\n", n % 256, (n * 7) % 256))
        .collect();
    let artifacts = engine.run(&raw).unwrap();

    assert!(artifacts.grammar_program.contains("IpAddressDataModelElement"));
}

#[test]
fn scenario_varying_tail_length_produces_ordered_alternation() {
    let cfg = space_only_config();
    let engine = Engine::new(&cfg).unwrap();
    let raw = "a a a\na aaa aaa\na aa aa\n";
    let artifacts = engine.run(raw).unwrap();

    assert!(artifacts.grammar_program.contains("FirstMatchModelElement"));
}

#[test]
fn scenario_mixed_corpus_produces_two_top_level_alternatives() {
    let cfg = space_only_config();
    let engine = Engine::new(&cfg).unwrap();

    let mut raw = String::new();
    for i in 0..5000 {
        if i % 2 == 0 {
            raw.push_str("System started at 120000.\n");
        } else {
            raw.push_str("System started at 120000. This is an optional part of the log line.\n");
        }
    }
    for _ in 0..5000 {
        raw.push_str("word one two three four five six\n");
    }

    let artifacts = engine.run(&raw).unwrap();
    assert!(artifacts.grammar_program.contains("FirstMatchModelElement"));
    assert!(artifacts.grammar_program.contains("OptionalMatchModelElement"));
}
