//! Reply ordering and delivery through a running engine.

use std::future::Future;
use std::time::Duration;

use rhizome_glyph_editor::Keymap;
use rhizome_glyph_session::{Engine, Replies, Reply, Request, Session, spawn_engine};
use tokio::time::timeout;

/// Echoes payloads back, taking longer for earlier payloads.
struct SlowEcho;

impl Engine for SlowEcho {
    fn handle(&mut self, request: Request, replies: &Replies) -> impl Future<Output = ()> + Send {
        let delay = match request.payload.as_str() {
            "payload1" => 40,
            "payload2" => 10,
            _ => 0,
        };
        async move {
            tokio::time::sleep(Duration::from_millis(delay)).await;
            let result = request.payload.replace("payload", "result");
            replies.emit(Reply::Result(format!("{result};")));
        }
    }
}

/// Upper-cases payloads.
struct Shout;

impl Engine for Shout {
    fn handle(&mut self, request: Request, replies: &Replies) -> impl Future<Output = ()> + Send {
        replies.emit(Reply::Result(request.payload.to_uppercase()));
        std::future::ready(())
    }
}

/// Emits several replies of different kinds per request.
struct Chatty;

impl Engine for Chatty {
    fn handle(&mut self, request: Request, replies: &Replies) -> impl Future<Output = ()> + Send {
        replies.emit(Reply::Other {
            kind: "typing".to_string(),
            result: format!("[{}] ", request.action_name),
        });
        replies.emit(Reply::Result(request.payload));
        replies.emit(Reply::Error("\n".to_string()));
        std::future::ready(())
    }
}

async fn pump_n<E, L>(session: &mut Session<E, L>, n: usize)
where
    E: rhizome_glyph_editor::EditorWidget,
    L: rhizome_glyph_editor::LogSink,
{
    for _ in 0..n {
        let alive = timeout(Duration::from_secs(5), session.pump())
            .await
            .expect("timed out waiting for a reply");
        assert!(alive, "engine closed early");
    }
}

#[tokio::test]
async fn test_fifo_regardless_of_latency() {
    let mut session = Session::in_memory(Keymap::default(), spawn_engine(SlowEcho));

    session.dispatch("a", "payload1", |_| {});
    session.dispatch("b", "payload2", |_| {});
    session.dispatch("a", "payload3", |_| {});

    pump_n(&mut session, 3).await;
    assert_eq!(session.log().contents(), "result1;result2;result3;");
}

#[tokio::test]
async fn test_evaluate_scenario() {
    let mut session = Session::in_memory(Keymap::default(), spawn_engine(Chatty));

    session.load_source("1+1");
    session.evaluate(|_| {});

    pump_n(&mut session, 3).await;
    assert_eq!(session.log().contents(), "[editor] 1+1\n");
}

#[tokio::test]
async fn test_back_to_back_requests() {
    let mut session = Session::in_memory(Keymap::default(), spawn_engine(Shout));

    session.dispatch("editor", "a", |_| {});
    session.dispatch("editor", "b", |_| {});

    pump_n(&mut session, 2).await;
    assert_eq!(session.log().contents(), "AB");
}

#[tokio::test]
async fn test_same_name_overwrites_continuation() {
    use std::cell::RefCell;
    use std::rc::Rc;

    let mut session = Session::in_memory(Keymap::default(), spawn_engine(Shout));
    let seen = Rc::new(RefCell::new(Vec::new()));

    let first = Rc::clone(&seen);
    session.dispatch("x", "p1", move |r| first.borrow_mut().push(format!("c1 {r}")));
    let second = Rc::clone(&seen);
    session.dispatch("x", "p2", move |r| second.borrow_mut().push(format!("c2 {r}")));

    pump_n(&mut session, 2).await;

    // Delivery only feeds the log.
    assert_eq!(session.log().contents(), "P1P2");
    assert!(seen.borrow().is_empty());

    let registry = session.dispatcher_mut().registry_mut();
    assert_eq!(registry.len(), 1);
    let continuation = registry.take("x").unwrap();
    continuation("r".to_string());
    assert_eq!(*seen.borrow(), vec!["c2 r".to_string()]);
}

#[tokio::test]
async fn test_drain_delivers_arrived_replies() {
    let mut session = Session::in_memory(Keymap::default(), spawn_engine(Shout));

    session.dispatch("editor", "x", |_| {});
    session.dispatch("editor", "y", |_| {});

    let mut delivered = 0;
    for _ in 0..100 {
        delivered += session.drain();
        if delivered == 2 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }

    assert_eq!(delivered, 2);
    assert_eq!(session.log().contents(), "XY");
    assert_eq!(session.drain(), 0);
}
