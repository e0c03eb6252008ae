//! # Readiness Gate and Lookups
//!
//! Drives the discovery service with raw control-plane requests and checks
//! that nobody is told to proceed before the expected population is in.

#[cfg(test)]
mod tests {
    use courier_reactor::{DiscoveryClient, TransportContext};
    use courier_types::{DiscoveryResponse, DisseminationMode, Endpoint, RegisterResponse, Role};
    use tokio::time::timeout;

    use crate::integration::support::{start_discovery, FLOW_TIMEOUT};

    async fn client(ctx: &TransportContext, discovery: &str) -> DiscoveryClient {
        DiscoveryClient::connect(ctx, discovery).await.unwrap()
    }

    async fn register(
        client: &mut DiscoveryClient,
        role: Role,
        name: &str,
        port: u16,
        topics: &[&str],
    ) -> DiscoveryResponse {
        client
            .register(
                role,
                Endpoint::new(name, "127.0.0.1", port),
                topics.iter().map(|t| t.to_string()).collect(),
            )
            .await
            .unwrap();
        timeout(FLOW_TIMEOUT, client.next_reply()).await.unwrap().unwrap()
    }

    async fn ready(client: &mut DiscoveryClient) -> bool {
        client.is_ready().await.unwrap();
        match timeout(FLOW_TIMEOUT, client.next_reply()).await.unwrap().unwrap() {
            DiscoveryResponse::IsReady { status } => status,
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_single_publisher_single_subscriber() {
        let ctx = TransportContext::new();
        let discovery = start_discovery(&ctx, DisseminationMode::Direct, 1, 1).await;
        let mut publisher = client(&ctx, &discovery).await;
        let mut subscriber = client(&ctx, &discovery).await;

        assert!(!ready(&mut subscriber).await);

        let reply = register(&mut publisher, Role::Publisher, "p1", 6001, &["weather", "sound"]).await;
        assert_eq!(
            reply,
            DiscoveryResponse::Register(RegisterResponse::success("publisher name is unique"))
        );
        assert!(!ready(&mut publisher).await);

        register(&mut subscriber, Role::Subscriber, "s1", 0, &["sound"]).await;
        assert!(ready(&mut publisher).await);
        assert!(ready(&mut subscriber).await);

        subscriber
            .lookup_publishers_by_topic(vec!["sound".into(), "light".into()])
            .await
            .unwrap();
        assert_eq!(
            subscriber.next_reply().await.unwrap(),
            DiscoveryResponse::LookupPublishersByTopic {
                publishers: vec![Endpoint::new("p1", "127.0.0.1", 6001)],
            }
        );

        subscriber
            .lookup_publishers_by_topic(vec!["light".into()])
            .await
            .unwrap();
        assert_eq!(
            subscriber.next_reply().await.unwrap(),
            DiscoveryResponse::LookupPublishersByTopic { publishers: vec![] }
        );
    }

    #[tokio::test]
    async fn test_two_publishers_gate_readiness() {
        let ctx = TransportContext::new();
        let discovery = start_discovery(&ctx, DisseminationMode::Direct, 2, 1).await;
        let mut c = client(&ctx, &discovery).await;

        register(&mut c, Role::Publisher, "p1", 6001, &["weather"]).await;
        register(&mut c, Role::Subscriber, "s1", 0, &["weather"]).await;
        assert!(!ready(&mut c).await);

        // a rejected duplicate does not count
        let reply = register(&mut c, Role::Publisher, "p1", 6002, &["weather"]).await;
        assert_eq!(
            reply,
            DiscoveryResponse::Register(RegisterResponse::failure("publisher name is not unique"))
        );
        assert!(!ready(&mut c).await);

        register(&mut c, Role::Publisher, "p2", 6002, &["humidity"]).await;
        assert!(ready(&mut c).await);

        c.lookup_all_publishers().await.unwrap();
        match c.next_reply().await.unwrap() {
            DiscoveryResponse::LookupAllPublishers { publishers } => {
                let ids: Vec<_> = publishers.iter().map(|p| p.id.as_str()).collect();
                assert_eq!(ids, ["p1", "p2"]);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_broker_mode_lookup_names_the_broker() {
        let ctx = TransportContext::new();
        let discovery = start_discovery(&ctx, DisseminationMode::Broker, 2, 2).await;
        let mut c = client(&ctx, &discovery).await;

        register(&mut c, Role::Publisher, "p1", 6001, &["weather"]).await;
        register(&mut c, Role::Subscriber, "s1", 0, &["weather"]).await;

        // before the broker registers there is nowhere to subscribe
        c.lookup_publishers_by_topic(vec!["weather".into()]).await.unwrap();
        assert_eq!(
            c.next_reply().await.unwrap(),
            DiscoveryResponse::LookupPublishersByTopic { publishers: vec![] }
        );

        register(&mut c, Role::Both, "broker", 6100, &["weather", "sound"]).await;
        assert!(ready(&mut c).await);

        c.lookup_publishers_by_topic(vec!["weather".into()]).await.unwrap();
        assert_eq!(
            c.next_reply().await.unwrap(),
            DiscoveryResponse::LookupPublishersByTopic {
                publishers: vec![Endpoint::new("broker", "127.0.0.1", 6100)],
            }
        );

        let reply = register(&mut c, Role::Both, "broker2", 6101, &["weather"]).await;
        assert_eq!(
            reply,
            DiscoveryResponse::Register(RegisterResponse::failure("only one broker allowed"))
        );
    }
}
