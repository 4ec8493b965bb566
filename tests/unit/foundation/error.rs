use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        EzidError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(EzidError::decode("x").to_string().contains("decode error:"));
    assert!(EzidError::asset("x").to_string().contains("asset error:"));
    assert!(EzidError::encode("x").to_string().contains("encode error:"));
    assert!(
        EzidError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn empty_queue_reads_as_nothing_to_export() {
    assert!(EzidError::EmptyQueue.to_string().contains("nothing to export"));
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = EzidError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
