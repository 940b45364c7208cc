//! End-to-end: a local WebSocket backend feeding the dashboard state.

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpListener;
use tokio_tungstenite::tungstenite::Message;

use healthwatch::app::Pane;
use healthwatch::config::Settings;
use healthwatch::ui::Theme;
use healthwatch::{App, ReconnectPolicy, WebSocketOptions, WebSocketSource};

fn frame(age: &str, sex: &str, symptoms: &str, metric: f64) -> Message {
    Message::Text(format!(
        r#"{{"AgeGroup":"{}","latitude":37.34,"longitude":-121.89,"Sex":"{}","DistanceMetric":{},"Symptoms":{}}}"#,
        age, sex, metric, symptoms
    ))
}

#[tokio::test]
async fn test_backend_stream_reaches_dashboard() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let server = tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let mut ws = tokio_tungstenite::accept_async(stream).await.unwrap();

        let request = ws.next().await.unwrap().unwrap();
        ws.send(Message::Text(r#"{"message":"Received"}"#.to_string())).await.unwrap();
        ws.send(frame("25", "male", r#"["covid"]"#, 0.5)).await.unwrap();
        ws.send(frame("67", "female", r#"["none"]"#, 2.5)).await.unwrap();
        ws.send(Message::Text("{not json".to_string())).await.unwrap();
        ws.send(frame("unknown", "other", r#"["cold","covid"]"#, 4.0)).await.unwrap();
        ws.send(Message::Text(r#"{"message":"pong"}"#.to_string())).await.unwrap();

        while let Some(Ok(_)) = ws.next().await {}
        request
    });

    let options = WebSocketOptions {
        ping_interval: Duration::from_secs(300),
        reconnect: ReconnectPolicy::never(),
    };
    let source = WebSocketSource::spawn(&format!("ws://{}", addr), options);
    let mut app = App::with_theme(Box::new(source), &Settings::default(), Theme::dark());

    for _ in 0..100 {
        app.reload_data();
        if app.buffer.len() >= 3 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }

    // Control and malformed frames never reach the buffer
    assert_eq!(app.buffer.len(), 3);
    assert_eq!(app.data.distance_samples, vec![0.5, 2.5, 4.0]);

    // Unparsable age is excluded from the age chart only
    assert_eq!(app.data.age.total(), 2);
    assert_eq!(app.data.record_count, 3);

    // One sick male and one healthy female
    assert_eq!(app.data.gender.sick_male, 50.0);
    assert_eq!(app.data.gender.not_sick_female, 50.0);

    // Left pane shows covid, right pane shows cold
    assert_eq!(app.pane(Pane::Left).map.points().len(), 2);
    assert_eq!(app.pane(Pane::Right).map.points().len(), 1);

    // Latest marker is fully opaque
    let markers = &app.data.markers;
    assert_eq!(markers.last().unwrap().opacity, 1.0);
    assert_eq!(markers[1].opacity, 0.4);

    drop(app);
    let request = server.await.unwrap();
    assert_eq!(
        request,
        Message::Text(r#"{"action":"send_initial_data"}"#.to_string())
    );
}
