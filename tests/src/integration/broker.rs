//! # Broker Dissemination
//!
//! Publishers send to the broker, the broker relays to subscribers with the
//! provenance marker appended.

#[cfg(test)]
mod tests {
    use courier_broker::BrokerState;
    use courier_participant::SubscriberState;
    use courier_reactor::TransportContext;
    use courier_types::DisseminationMode;

    use crate::integration::support::*;

    const MODE: DisseminationMode = DisseminationMode::Broker;

    #[tokio::test]
    async fn test_relay_through_broker() {
        let ctx = TransportContext::new();
        // the broker fills one publisher slot and one subscriber slot
        let discovery = start_discovery(&ctx, MODE, 2, 2).await;

        let _p1 = spawn_publisher(&ctx, &discovery, participant("p1", &["weather"], MODE, 400)).await;
        let sub = spawn_subscriber(&ctx, &discovery, participant("s1", &["weather"], MODE, 3)).await;
        let broker = spawn_broker(&ctx, &discovery, 10, 20).await;

        let (sub, _) = finish(sub).await;
        assert_eq!(sub.state(), SubscriberState::Completed);
        // the lookup answered with the broker only
        assert_eq!(sub.publishers(), 1);
        for record in sub.records() {
            assert!(record.from_broker);
            assert_eq!(record.pub_id, "p1");
            assert_eq!(record.topic, "weather");
        }

        let (broker, _) = finish(broker).await;
        assert_eq!(broker.state(), BrokerState::Completed);
        assert_eq!(broker.relayed(), 10);
        assert_eq!(broker.buffered(), 0);
    }

    #[tokio::test]
    async fn test_subscriber_quota_matching_broker_batch_completes() {
        let ctx = TransportContext::new();
        let discovery = start_discovery(&ctx, MODE, 2, 2).await;

        // the batch of 10 is shared between weather and sound, so fewer
        // than 10 weather messages ever reach s1
        let _p1 = spawn_publisher(
            &ctx,
            &discovery,
            participant("p1", &["weather", "sound"], MODE, 400),
        )
        .await;
        let sub = spawn_subscriber(&ctx, &discovery, participant("s1", &["weather"], MODE, 10)).await;
        let broker = spawn_broker(&ctx, &discovery, 10, 50).await;

        let (sub, _) = finish(sub).await;
        assert_eq!(sub.state(), SubscriberState::Completed);
        assert!(sub.records().len() < 10);
        for record in sub.records() {
            assert!(record.from_broker);
            assert_eq!(record.topic, "weather");
        }

        let (broker, _) = finish(broker).await;
        assert_eq!(broker.relayed(), 10);
    }

    #[tokio::test]
    async fn test_relay_preserves_publisher_order() {
        let ctx = TransportContext::new();
        let discovery = start_discovery(&ctx, MODE, 2, 2).await;

        let _p1 = spawn_publisher(&ctx, &discovery, participant("p1", &["light"], MODE, 400)).await;
        let sub = spawn_subscriber(&ctx, &discovery, participant("s1", &["light"], MODE, 5)).await;
        let _broker = spawn_broker(&ctx, &discovery, 20, 100).await;

        let (sub, _) = finish(sub).await;
        let sent: Vec<_> = sub.records().iter().map(|r| r.sent_time.clone()).collect();
        let mut sorted = sent.clone();
        sorted.sort();
        assert_eq!(sent, sorted);
    }
}
