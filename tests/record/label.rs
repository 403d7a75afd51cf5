use pretty_assertions::assert_eq;
use record_lifetimes::record::{LABEL_CAPACITY, Label, LabelTooLong, Record};

#[test]
fn label_holds_text() {
    let label = Label::new("Mohamed").unwrap();
    assert_eq!(label.as_str(), "Mohamed");
    assert_eq!(label.len(), 7);
    assert_eq!(label.capacity(), LABEL_CAPACITY);
    assert_eq!(label, "Mohamed");
}

#[test]
fn label_at_capacity_fits() {
    let text = "x".repeat(LABEL_CAPACITY);
    let label = Label::new(&text).unwrap();
    assert_eq!(label.len(), LABEL_CAPACITY);
}

#[test]
fn label_over_capacity_is_rejected() {
    let text = "x".repeat(LABEL_CAPACITY + 1);
    assert_eq!(
        Label::new(&text).unwrap_err(),
        LabelTooLong {
            len: LABEL_CAPACITY + 1,
            capacity: LABEL_CAPACITY,
        }
    );
    assert!(Label::try_from(text.as_str()).is_err());
}

#[test]
fn capacity_counts_bytes_not_characters() {
    // 26 characters, 52 bytes
    let text = "é".repeat(26);
    assert_eq!(text.chars().count(), 26);
    assert_eq!(Label::new(&text).unwrap_err().len, 52);

    let label = Label::truncated(&text);
    assert_eq!(label.len(), LABEL_CAPACITY);
    assert_eq!(label.as_str().chars().count(), 25);
}

#[test]
fn truncation_keeps_prefix() {
    let text = "y".repeat(LABEL_CAPACITY + 10);
    let label = Label::truncated(&text);
    assert_eq!(label.as_str(), &text[..LABEL_CAPACITY]);
}

#[test]
fn truncation_never_splits_a_character() {
    // 49 ascii bytes then a two-byte character straddling the limit
    let text = format!("{}é", "a".repeat(LABEL_CAPACITY - 1));
    let label = Label::truncated(&text);
    assert_eq!(label.len(), LABEL_CAPACITY - 1);
    assert!(label.as_str().chars().all(|c| c == 'a'));
}

#[test]
fn short_label_is_not_truncated() {
    assert_eq!(Label::truncated("Omar"), Label::new("Omar").unwrap());
}

#[test]
fn empty_label_is_default() {
    let label = Label::default();
    assert!(label.is_empty());
    assert_eq!(label, Label::empty());
    assert_eq!(format!("{label:?}"), "\"\"");
}

#[test]
fn set_name_rejects_without_touching_record() {
    let mut record = Record::new(3, Label::new("Samir").unwrap(), 1.0);
    let long = "z".repeat(LABEL_CAPACITY * 2);
    assert!(record.set_name(&long).is_err());
    assert_eq!(record.name, "Samir");
}
