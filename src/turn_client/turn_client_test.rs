use super::*;

#[test]
fn test_refresh_interval_leaves_margin() {
    let lifetime = Duration::from_secs(600);
    assert_eq!(refresh_interval(lifetime), Duration::from_secs(540));
}

#[test]
fn test_refresh_interval_saturates_on_short_lifetime() {
    let lifetime = Duration::from_secs(10);
    assert_eq!(refresh_interval(lifetime), Duration::from_secs(0));
}
