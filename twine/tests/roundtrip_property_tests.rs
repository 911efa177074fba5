use proptest::prelude::*;
use std::collections::BTreeMap;
use twine::{CollectingSink, Consumer, FormatType, Options, Row, StringsFile};

fn key_strategy() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[a-z][a-z0-9_]{0,15}").expect("valid key regex")
}

/// Values without leading or trailing spaces, which `.properties` trims.
fn value_strategy() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[A-Za-z0-9_\\-\\.,!\\?]([A-Za-z0-9 _\\-\\.,!\\?]{0,28}[A-Za-z0-9_\\-\\.,!\\?])?")
        .expect("valid value regex")
}

/// Values as the canonical file must preserve them, edge spaces included.
fn raw_value_strategy() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[A-Za-z0-9 _\\-\\.,!\\?]{0,30}").expect("valid value regex")
}

fn comment_strategy() -> impl Strategy<Value = Option<String>> {
    proptest::option::of(
        proptest::string::string_regex("[A-Za-z0-9]([A-Za-z0-9 ]{0,19}[A-Za-z0-9])?").expect("valid comment regex"),
    )
}

type Dataset = BTreeMap<String, (String, String, Option<String>)>;

fn dataset_strategy(values: BoxedStrategy<String>) -> impl Strategy<Value = Dataset> {
    prop::collection::btree_map(
        key_strategy(),
        (values.clone(), values, comment_strategy()),
        1..8,
    )
}

fn build_strings(values: &Dataset) -> StringsFile {
    let mut strings = StringsFile::new();
    strings.add_language_code("en");
    strings.add_language_code("fr");
    let first = strings.add_section("First");
    let second = strings.add_section("Second");
    for (i, (key, (en, fr, comment))) in values.iter().enumerate() {
        let mut row = Row::new(key.as_str())
            .with_translation("en", en)
            .with_translation("fr", fr);
        row.comment = comment.clone();
        strings.push_row(if i % 2 == 0 { first } else { second }, row);
    }
    strings.resolve_references();
    strings
}

fn read_back(format: FormatType, content: &str, lang: &str) -> StringsFile {
    let mut strings = StringsFile::new();
    let options = Options::new().with_consume_all(true).with_consume_comments(true);
    let mut sink = CollectingSink::new();
    let mut consumer = Consumer::new(&mut strings, &options, &mut sink);
    format
        .formatter()
        .read(content, lang, &mut consumer)
        .expect("generated file should read back");
    strings
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 48,
        .. ProptestConfig::default()
    })]

    #[test]
    fn canonical_file_roundtrip_preserves_model(values in dataset_strategy(raw_value_strategy().boxed())) {
        let strings = build_strings(&values);
        let mut sink = CollectingSink::new();
        let text = strings.serialize(&mut sink);
        let parsed: StringsFile = text.parse().expect("serialized file should parse");

        prop_assert_eq!(parsed.language_codes(), strings.language_codes());
        prop_assert_eq!(parsed.sections().len(), 2);
        for (key, (en, fr, comment)) in &values {
            let row = parsed.get(key).expect("row should survive");
            prop_assert_eq!(row.translation("en"), Some(en.as_str()));
            prop_assert_eq!(row.translation("fr"), Some(fr.as_str()));
            prop_assert_eq!(&row.comment, comment);
        }
        prop_assert_eq!(parsed.serialize(&mut sink), text);
    }

    #[test]
    fn generated_files_read_back_to_the_same_translations(values in dataset_strategy(value_strategy().boxed())) {
        let strings = build_strings(&values);
        let formats = [
            FormatType::Apple,
            FormatType::Android,
            FormatType::Gettext,
            FormatType::JQuery,
            FormatType::Django,
            FormatType::Flash,
        ];
        for format in formats {
            let output = format
                .formatter()
                .format_file(&strings, "fr", &Options::new())
                .expect("formatting should succeed")
                .expect("output should not be empty");
            let read = read_back(format, &output, "fr");
            for (key, (_, fr, _)) in &values {
                let row = read.get(key);
                prop_assert!(row.is_some(), "{format}: missing {key}");
                prop_assert_eq!(row.and_then(|r| r.translation("fr")), Some(fr.as_str()), "{}", format);
            }
        }
    }
}

#[test]
fn canonical_file_with_explicit_unnamed_section_roundtrips() {
    let text = "[[]]\n\t[k]\n\t\ten = v\n\t\ttags = a,,b\n\n[[B]]\n\t[other]\n\t\ten = w\n";
    let parsed: StringsFile = text.parse().expect("document should parse");
    let mut sink = CollectingSink::new();
    assert_eq!(parsed.serialize(&mut sink), text);
}
