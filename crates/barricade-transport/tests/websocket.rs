//! Integration tests for the WebSocket push channel.
//!
//! These spin up a real listener and a real tokio-tungstenite client to
//! verify that text flows, closes are detected, and the sink/receiver
//! pair share the open flag.

#[cfg(feature = "websocket")]
mod websocket {
    use barricade_transport::{ClientSink, WebSocketListener};
    use futures_util::{SinkExt, StreamExt};
    use tokio_tungstenite::tungstenite::Message;

    #[tokio::test]
    async fn test_push_text_reaches_client() {
        let listener = WebSocketListener::bind("127.0.0.1:0")
            .await
            .expect("should bind");
        let addr = listener.local_addr().unwrap();

        let connect = tokio_tungstenite::connect_async(format!("ws://{addr}"));
        let (accepted, connected) = tokio::join!(listener.accept(), connect);
        let (sink, _receiver) = accepted.expect("should accept");
        let (mut client_ws, _) = connected.expect("client should connect");

        assert!(sink.id().into_inner() > 0);
        assert!(sink.is_open());

        sink.send("{\"hello\":true}").await.expect("send should succeed");

        let msg = client_ws.next().await.unwrap().unwrap();
        assert_eq!(msg.into_text().unwrap().as_str(), "{\"hello\":true}");
    }

    #[tokio::test]
    async fn test_receiver_sees_subscribe_frame() {
        let listener = WebSocketListener::bind("127.0.0.1:0")
            .await
            .expect("should bind");
        let addr = listener.local_addr().unwrap();

        let connect = tokio_tungstenite::connect_async(format!("ws://{addr}"));
        let (accepted, connected) = tokio::join!(listener.accept(), connect);
        let (_sink, mut receiver) = accepted.expect("should accept");
        let (mut client_ws, _) = connected.expect("client should connect");

        client_ws
            .send(Message::Text("42".to_owned().into()))
            .await
            .unwrap();

        let frame = receiver.next_text().await.expect("recv should succeed");
        assert_eq!(frame.as_deref(), Some("42"));
    }

    #[tokio::test]
    async fn test_client_close_marks_sink_dead() {
        let listener = WebSocketListener::bind("127.0.0.1:0")
            .await
            .expect("should bind");
        let addr = listener.local_addr().unwrap();

        let connect = tokio_tungstenite::connect_async(format!("ws://{addr}"));
        let (accepted, connected) = tokio::join!(listener.accept(), connect);
        let (sink, mut receiver) = accepted.expect("should accept");
        let (mut client_ws, _) = connected.expect("client should connect");

        client_ws.send(Message::Close(None)).await.unwrap();

        let frame = receiver.next_text().await.expect("recv should not error");
        assert!(frame.is_none(), "clean close should yield None");
        assert!(!sink.is_open(), "close must propagate to the sink");

        let result = sink.send("too late").await;
        assert!(result.is_err(), "sending on a closed sink must fail");
    }

    #[tokio::test]
    async fn test_connection_ids_are_unique() {
        let listener = WebSocketListener::bind("127.0.0.1:0")
            .await
            .expect("should bind");
        let addr = listener.local_addr().unwrap();

        let connect = tokio_tungstenite::connect_async(format!("ws://{addr}"));
        let (accepted, connected) = tokio::join!(listener.accept(), connect);
        let (sink_a, _recv_a) = accepted.expect("should accept");
        let _client_a = connected.expect("client should connect");

        let connect = tokio_tungstenite::connect_async(format!("ws://{addr}"));
        let (accepted, connected) = tokio::join!(listener.accept(), connect);
        let (sink_b, _recv_b) = accepted.expect("should accept");
        let _client_b = connected.expect("client should connect");

        assert_ne!(sink_a.id(), sink_b.id());
    }
}
