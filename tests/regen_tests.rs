//! Integration tests for table regeneration

mod common;

use std::fs;

use common::{sample_dataset, TempDir};
use unicodeit_datagen::core::verify::{parse_compiled, ParsedElement};
use unicodeit_datagen::core::{escape_str, unescape_literal};
use unicodeit_datagen::data::MemoryDatasetSource;
use unicodeit_datagen::diagnostics::{check_dataset, DiagnosticLevel};
use unicodeit_datagen::{
    is_up_to_date, regenerate, write_atomic, Dataset, DatasetSource, FileDatasetSource, GenError,
    MappingEntry, RegenOptions, TableCompiler,
};

fn pairs(parsed: &unicodeit_datagen::core::ParsedOutput, table: &str) -> Vec<MappingEntry> {
    parsed.tables[table]
        .elements
        .iter()
        .map(|element| match element {
            ParsedElement::Pair(entry) => entry.clone(),
            ParsedElement::Str(s) => panic!("{} holds a bare string {:?}", table, s),
        })
        .collect()
}

fn strings(parsed: &unicodeit_datagen::core::ParsedOutput, table: &str) -> Vec<String> {
    parsed.tables[table]
        .elements
        .iter()
        .map(|element| match element {
            ParsedElement::Str(s) => s.clone(),
            ParsedElement::Pair(entry) => panic!("{} holds a pair {:?}", table, entry),
        })
        .collect()
}

fn permutations<T: Clone>(items: &[T]) -> Vec<Vec<T>> {
    if items.len() <= 1 {
        return vec![items.to_vec()];
    }
    let mut out = Vec::new();
    for i in 0..items.len() {
        let mut rest = items.to_vec();
        let first = rest.remove(i);
        for mut tail in permutations(&rest) {
            tail.insert(0, first.clone());
            out.push(tail);
        }
    }
    out
}

// ============================================================================
// Escaping
// ============================================================================

mod escaping {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_escape_round_trip_edge_strings() {
        let cases = [
            "",
            "\\\"'",
            "!#$%&()*+,-./:;<=>?@[]^_`{|}~",
            "\u{301}",
            "e\u{301}\u{338}",
            "\u{1d400}\u{1f600}",
            "\t\n\r\u{7f}",
            "\0",
        ];
        for case in cases {
            let escaped = escape_str(case);
            assert!(
                escaped.chars().all(|c| (' '..='~').contains(&c)),
                "escaped form of {:?} is not printable ASCII: {:?}",
                case,
                escaped
            );
            assert_eq!(unescape_literal(&escaped).unwrap(), case);
        }
    }

    #[test]
    fn test_nul_uses_zero_digit() {
        assert_eq!(escape_str("\0"), "\\u{0}");
    }
}

// ============================================================================
// Compilation
// ============================================================================

mod compile {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_idempotent_output() {
        let compiler = TableCompiler::default();
        let first = compiler.compile(&sample_dataset()).unwrap();
        let second = compiler.compile(&sample_dataset()).unwrap();
        assert_eq!(first.text, second.text);
    }

    #[test]
    fn test_order_preserved_for_all_permutations() {
        let base = vec![
            MappingEntry::new("\\a{}", "1"),
            MappingEntry::new("\\b", "2"),
            MappingEntry::new("\\c{}", "3"),
            MappingEntry::new("\\d", "4"),
        ];
        let compiler = TableCompiler::default();
        for perm in permutations(&base) {
            let ds = Dataset {
                replacements: perm.clone(),
                ..sample_dataset()
            };
            let output = compiler.compile(&ds).unwrap();
            let parsed = parse_compiled(&output.text).unwrap();

            assert_eq!(pairs(&parsed, "REPLACEMENTS"), perm);
            let bracketed: Vec<_> = perm
                .iter()
                .filter(|e| e.key.ends_with("{}"))
                .cloned()
                .collect();
            assert_eq!(pairs(&parsed, "REPLACEMENTS_WITH_BRACKET_SUFFIX"), bracketed);
        }
    }

    #[test]
    fn test_bracket_suffix_table() {
        let ds = Dataset {
            replacements: vec![
                MappingEntry::new("a{}", "X"),
                MappingEntry::new("b", "Y"),
                MappingEntry::new("c{}", "Z"),
            ],
            ..sample_dataset()
        };
        let output = TableCompiler::default().compile(&ds).unwrap();
        let parsed = parse_compiled(&output.text).unwrap();
        assert_eq!(
            pairs(&parsed, "REPLACEMENTS_WITH_BRACKET_SUFFIX"),
            vec![MappingEntry::new("a{}", "X"), MappingEntry::new("c{}", "Z")]
        );
    }

    #[test]
    fn test_escaped_latex_table() {
        let ds = Dataset {
            combining_marks: vec![MappingEntry::new("^acute", "\u{301}")],
            ..sample_dataset()
        };
        let output = TableCompiler::default().compile(&ds).unwrap();
        let parsed = parse_compiled(&output.text).unwrap();
        assert_eq!(
            strings(&parsed, "COMBINING_MARKS_ESCAPED_LATEX"),
            vec!["\\ acute{".to_string()]
        );
    }

    #[test]
    fn test_delimiter_collision_rejected() {
        let ds = Dataset {
            replacements: vec![
                MappingEntry::new("\\x{}", "x"),
                MappingEntry::new("\\evil\"##", "y"),
            ],
            ..sample_dataset()
        };
        match TableCompiler::default().compile(&ds) {
            Err(GenError::MalformedData { table, message }) => {
                assert_eq!(table, "REPLACEMENTS");
                assert!(message.contains("\"##"));
            }
            other => panic!("expected MalformedData, got {:?}", other),
        }
    }

    #[test]
    fn test_text_direction_control_in_key_rejected() {
        let ds = Dataset {
            sub_super_scripts: vec![MappingEntry::new("^\u{2067}x", "y")],
            ..sample_dataset()
        };
        match TableCompiler::default().compile(&ds) {
            Err(GenError::MalformedData { table, message }) => {
                assert_eq!(table, "SUB_SUPER_SCRIPTS");
                assert!(message.contains("U+2067"), "{}", message);
            }
            other => panic!("expected MalformedData, got {:?}", other),
        }
        let lint = check_dataset(&ds);
        assert!(lint.has_errors());
    }

    #[test]
    fn test_empty_combining_key_rejected() {
        let ds = Dataset {
            combining_marks: vec![MappingEntry::new("", "\u{301}")],
            ..sample_dataset()
        };
        let err = TableCompiler::default().compile(&ds).unwrap_err();
        assert!(err.is_data_error());
    }

    #[test]
    fn test_every_value_survives() {
        let ds = sample_dataset();
        let output = TableCompiler::default().compile(&ds).unwrap();
        let parsed = parse_compiled(&output.text).unwrap();
        assert_eq!(parsed.constants["UNICODEIT_VERSION"], "0.7.5");
        assert_eq!(pairs(&parsed, "REPLACEMENTS"), ds.replacements);
        assert_eq!(pairs(&parsed, "COMBINING_MARKS"), ds.combining_marks);
        assert_eq!(pairs(&parsed, "SUB_SUPER_SCRIPTS"), ds.sub_super_scripts);
    }
}

// ============================================================================
// Files
// ============================================================================

mod files {
    use super::*;
    use pretty_assertions::assert_eq;

    const UPSTREAM_JSON: &str = r#"{
        "__version__": "0.7.5",
        "REPLACEMENTS": [["\\not{}", "\u0338"], ["\\doteq", "\u2250"], ["\\'", "'"]],
        "COMBININGMARKS": [["\\acute", "\u0301"]],
        "SUBSUPERSCRIPTS": [["^2", "\u00b2"]]
    }"#;

    #[test]
    fn test_file_source_to_output_file() {
        let temp = TempDir::new("file_source");
        let input = temp.join("unicodeit.json");
        let output = temp.join("data.rs");
        fs::write(&input, UPSTREAM_JSON).unwrap();

        let source = FileDatasetSource::new(&input);
        let outcome = regenerate(&source, &output, RegenOptions::default()).unwrap();
        assert!(outcome.changed());

        let text = fs::read_to_string(&output).unwrap();
        assert!(text.contains("// unicodeit.__version__: 0.7.5\n"));
        assert!(text.contains("    (r##\"\\'\"##, \"\\'\"),\n"));
        assert!(text.contains("    (r##\"\\not{}\"##, \"\\u{338}\"),\n"));

        let parsed = parse_compiled(&text).unwrap();
        assert_eq!(pairs(&parsed, "REPLACEMENTS"), source.load().unwrap().replacements);
        assert!(!temp.join(".data.rs.tmp").exists());
    }

    #[test]
    fn test_missing_input_writes_nothing() {
        let temp = TempDir::new("missing_input");
        let output = temp.join("data.rs");
        let source = FileDatasetSource::new(temp.join("absent.json"));
        let err = regenerate(&source, &output, RegenOptions::default()).unwrap_err();
        assert!(matches!(err, GenError::MissingInput { .. }));
        assert!(!output.exists());
    }

    #[test]
    fn test_bad_json_reports_path() {
        let temp = TempDir::new("bad_json");
        let input = temp.join("unicodeit.json");
        fs::write(&input, "{ \"version\": ").unwrap();
        let err = FileDatasetSource::new(&input).load().unwrap_err();
        assert!(matches!(err, GenError::DatasetFormat { ref path, .. } if *path == input));
    }

    #[test]
    fn test_write_atomic_replaces_file() {
        let temp = TempDir::new("atomic");
        let path = temp.join("data.rs");
        fs::write(&path, "old").unwrap();
        write_atomic(&path, "new contents\n").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "new contents\n");
        assert!(!temp.join(".data.rs.tmp").exists());
    }

    #[test]
    fn test_write_atomic_into_missing_dir_fails() {
        let temp = TempDir::new("atomic_missing");
        let path = temp.join("nope").join("data.rs");
        let err = write_atomic(&path, "x").unwrap_err();
        assert!(matches!(err, GenError::Io { .. }));
        assert!(!path.exists());
    }

    #[test]
    fn test_check_mode() {
        let temp = TempDir::new("check");
        let path = temp.join("data.rs");
        let compiler = TableCompiler::default();
        let output = compiler.compile(&sample_dataset()).unwrap();

        assert!(!is_up_to_date(&path, &output).unwrap());
        write_atomic(&path, &output.text).unwrap();
        assert!(is_up_to_date(&path, &output).unwrap());

        let changed = compiler
            .compile(&sample_dataset().with_sub_super_scripts([("^3", "\u{b3}")]))
            .unwrap();
        assert!(!is_up_to_date(&path, &changed).unwrap());
    }

    #[test]
    fn test_regenerate_unchanged_keeps_bytes() {
        let temp = TempDir::new("unchanged");
        let path = temp.join("data.rs");
        let source = MemoryDatasetSource::new(sample_dataset());

        regenerate(&source, &path, RegenOptions::default()).unwrap();
        let before = fs::read(&path).unwrap();
        let outcome = regenerate(&source, &path, RegenOptions::default()).unwrap();
        assert!(!outcome.changed());
        assert_eq!(fs::read(&path).unwrap(), before);
    }
}

// ============================================================================
// Lint
// ============================================================================

mod lint {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_sample_is_clean() {
        let result = check_dataset(&sample_dataset());
        assert!(!result.has_errors());
        assert_eq!(result.warnings, 0);
    }

    #[test]
    fn test_lint_flags_what_compiler_rejects() {
        let ds = Dataset {
            replacements: vec![
                MappingEntry::new("\\x{}", "x"),
                MappingEntry::new("\\evil\"##", "y"),
            ],
            ..sample_dataset()
        };
        let result = check_dataset(&ds);
        assert!(result.has_errors());
        assert!(result
            .diagnostics
            .iter()
            .any(|d| d.level == DiagnosticLevel::Error && d.key.as_deref() == Some("\\evil\"##")));
        assert!(TableCompiler::default().compile(&ds).is_err());
    }
}
