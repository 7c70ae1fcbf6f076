use stemma::LayoutError;
use stemma::data::PriorityQueue;

#[test]
fn priority_queue_extracts_keys_in_priority_order() {
    let mut pq = PriorityQueue::new();
    pq.add("b", 2);
    pq.add("a", 1);
    pq.add("c", 3);

    assert_eq!(pq.min(), Some("a"));
    assert_eq!(pq.remove_min().as_deref(), Some("a"));
    assert_eq!(pq.remove_min().as_deref(), Some("b"));
    assert_eq!(pq.remove_min().as_deref(), Some("c"));
    assert_eq!(pq.remove_min(), None);
}

#[test]
fn priority_queue_add_rejects_duplicate_keys() {
    let mut pq = PriorityQueue::new();
    assert!(pq.add("a", 1));
    assert!(!pq.add("a", 5));
    assert_eq!(pq.priority("a"), Some(1));
    assert_eq!(pq.len(), 1);
}

#[test]
fn priority_queue_decrease_moves_key_to_front() {
    let mut pq = PriorityQueue::new();
    pq.add("a", 10);
    pq.add("b", 5);

    pq.decrease("a", 1).unwrap();
    assert_eq!(pq.min(), Some("a"));
    assert_eq!(pq.priority("a"), Some(1));
}

#[test]
fn priority_queue_decrease_rejects_priority_increase() {
    let mut pq = PriorityQueue::new();
    pq.add("a", 5);

    let err = pq.decrease("a", 10).unwrap_err();
    assert!(matches!(
        err,
        LayoutError::PriorityIncrease {
            current: 5,
            requested: 10,
            ..
        }
    ));
    // The queue is untouched after a rejected decrease.
    assert_eq!(pq.priority("a"), Some(5));
}

#[test]
fn priority_queue_decrease_on_missing_key_is_an_error() {
    let mut pq = PriorityQueue::new();
    assert!(pq.decrease("ghost", 1).is_err());
}

#[test]
fn priority_queue_handles_interleaved_adds_and_removals() {
    let mut pq = PriorityQueue::new();
    pq.add("a", 4);
    pq.add("b", 2);
    assert_eq!(pq.remove_min().as_deref(), Some("b"));
    pq.add("c", 1);
    pq.add("d", 3);
    pq.decrease("d", 0).unwrap();
    assert_eq!(pq.remove_min().as_deref(), Some("d"));
    assert_eq!(pq.remove_min().as_deref(), Some("c"));
    assert_eq!(pq.remove_min().as_deref(), Some("a"));
    assert!(pq.is_empty());
}
