use bridge_telemetry::new_request_ids;

#[test]
fn request_ids_are_unique() {
    let first = new_request_ids();
    let second = new_request_ids();
    assert_ne!(first.request_id, second.request_id);
    assert_ne!(first.trace_id, second.trace_id);
    assert!(!first.request_id.is_empty());
}
