//! # Direct Dissemination
//!
//! Subscribers look up matching publishers and connect to each of them.

#[cfg(test)]
mod tests {
    use courier_participant::{PublisherState, SubscriberState};
    use courier_reactor::TransportContext;
    use courier_types::DisseminationMode;
    use std::collections::BTreeSet;

    use crate::integration::support::*;

    const MODE: DisseminationMode = DisseminationMode::Direct;

    #[tokio::test]
    async fn test_subscriber_fans_in_from_two_publishers() {
        let ctx = TransportContext::new();
        let discovery = start_discovery(&ctx, MODE, 2, 1).await;

        let p1 = spawn_publisher(&ctx, &discovery, participant("p1", &["weather"], MODE, 400)).await;
        let p2 = spawn_publisher(&ctx, &discovery, participant("p2", &["humidity"], MODE, 400)).await;
        let sub = spawn_subscriber(
            &ctx,
            &discovery,
            participant("s1", &["weather", "humidity"], MODE, 40),
        )
        .await;

        let (sub, _) = finish(sub).await;
        assert_eq!(sub.state(), SubscriberState::Completed);
        assert_eq!(sub.publishers(), 2);
        assert_eq!(sub.records().len(), 40);
        assert!(sub.records().iter().all(|r| !r.from_broker));
        assert!(sub.records().iter().all(|r| r.num_topics == 2));

        let sources: BTreeSet<_> = sub.records().iter().map(|r| r.pub_id.as_str()).collect();
        assert_eq!(sources, BTreeSet::from(["p1", "p2"]));
        for record in sub.records() {
            let expected = if record.pub_id == "p1" { "weather" } else { "humidity" };
            assert_eq!(record.topic, expected);
        }

        for p in [p1, p2] {
            let (publisher, _) = finish(p).await;
            assert_eq!(publisher.state(), PublisherState::Completed);
            assert_eq!(publisher.sent(), 400);
        }
    }

    #[tokio::test]
    async fn test_subscriber_skips_unrelated_publishers() {
        let ctx = TransportContext::new();
        let discovery = start_discovery(&ctx, MODE, 2, 1).await;

        let _p1 = spawn_publisher(&ctx, &discovery, participant("p1", &["weather"], MODE, 400)).await;
        let _p2 = spawn_publisher(&ctx, &discovery, participant("p2", &["altitude"], MODE, 400)).await;
        let sub =
            spawn_subscriber(&ctx, &discovery, participant("s1", &["altitude"], MODE, 5)).await;

        let (sub, _) = finish(sub).await;
        assert_eq!(sub.publishers(), 1);
        assert!(sub.records().iter().all(|r| r.pub_id == "p2"));
    }

    #[tokio::test]
    async fn test_two_subscribers_receive_the_same_stream() {
        let ctx = TransportContext::new();
        let discovery = start_discovery(&ctx, MODE, 1, 2).await;

        let _p1 = spawn_publisher(&ctx, &discovery, participant("p1", &["sound"], MODE, 400)).await;
        let s1 = spawn_subscriber(&ctx, &discovery, participant("s1", &["sound"], MODE, 10)).await;
        let s2 = spawn_subscriber(&ctx, &discovery, participant("s2", &["sound"], MODE, 10)).await;

        let (s1, _) = finish(s1).await;
        let (s2, _) = finish(s2).await;
        assert_eq!(s1.records().len(), 10);
        assert_eq!(s2.records().len(), 10);
        assert!(s2.records().iter().all(|r| r.sub_id == "s2"));
    }

    #[tokio::test]
    async fn test_subscriber_with_no_matching_publisher_completes() {
        let ctx = TransportContext::new();
        let discovery = start_discovery(&ctx, MODE, 1, 1).await;

        let p1 = spawn_publisher(&ctx, &discovery, participant("p1", &["weather"], MODE, 50)).await;
        let sub = spawn_subscriber(&ctx, &discovery, participant("s1", &["sound"], MODE, 1)).await;

        let (sub, _) = finish(sub).await;
        assert_eq!(sub.state(), SubscriberState::Completed);
        assert_eq!(sub.publishers(), 0);
        assert!(sub.records().is_empty());

        let (publisher, _) = finish(p1).await;
        assert_eq!(publisher.sent(), 50);
    }
}
