use super::*;

#[tokio::test]
async fn test_component_state_defaults_to_disconnected() {
    let c = Component::new(1, IoMode::Pull);
    assert_eq!(c.state(), ComponentState::Disconnected);
    assert!(c.selected_pair().is_none());
}

#[tokio::test]
async fn test_component_set_state_notifies_waiters() {
    let c = Component::new(1, IoMode::Push);
    c.set_state(ComponentState::Ready);
    assert_eq!(c.state(), ComponentState::Ready);
}

#[tokio::test]
async fn test_component_queued_packets_drain_in_order() {
    let c = Component::new(1, IoMode::Pull);
    c.queue_packet(vec![1]).await;
    c.queue_packet(vec![2]).await;
    let drained = c.drain_queued_packets().await;
    assert_eq!(drained, vec![vec![1], vec![2]]);
    assert!(c.drain_queued_packets().await.is_empty());
}
