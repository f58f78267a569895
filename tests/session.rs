//! End-to-end session tests.
//!
//! Drives a [`Connection`] through whole conversations against a recording
//! transport: registration, traffic, nick changes, pacing, reconnects.

use slirc_client::{Connection, Event, HostMask, Input, ServerInfo, Transport};

/// Transport that records everything the connection asks of it.
#[derive(Debug, Default)]
struct Recorder {
    wrote: Vec<String>,
    connects: Vec<(String, u16)>,
    disconnects: usize,
}

impl Transport for Recorder {
    fn connect(&mut self, host: &str, port: u16) {
        self.connects.push((host.to_owned(), port));
    }

    fn disconnect(&mut self) {
        self.disconnects += 1;
    }

    fn write_line(&mut self, line: &str) {
        self.wrote.push(line.to_owned());
    }
}

fn new_session() -> Connection<Recorder> {
    let mut conn = Connection::new(
        ServerInfo::new("irc.example.org", 6667),
        Recorder::default(),
    );
    conn.set_ident("ident");
    conn.set_real_name("Test User");
    conn.set_nick("bob");
    conn
}

mod registration {
    use super::*;

    #[test]
    fn test_full_login_sequence() {
        let mut conn = new_session();
        conn.set_password(Some("hunter2".into()));
        conn.connect();

        let events = conn.apply(Input::Opened);
        assert_eq!(
            events,
            vec![Event::Connected(ServerInfo::new("irc.example.org", 6667))]
        );
        assert_eq!(
            conn.transport().wrote,
            vec![
                "PASS hunter2",
                "USER ident irc.example.org irc.example.org :Test User",
                "NICK bob",
            ]
        );
        assert!(conn.is_connected());
    }

    #[test]
    fn test_notice_auth_during_registration() {
        let mut conn = new_session();
        conn.connect();
        let _ = conn.apply(Input::Opened);

        let events = conn.apply(Input::Line(
            ":irc.example.org NOTICE AUTH :*** Looking up your hostname".into(),
        ));
        assert_eq!(
            events,
            vec![Event::NoticeAuth {
                server: "irc.example.org".into(),
                text: "*** Looking up your hostname".into(),
            }]
        );

        let events = conn.apply(Input::Line(
            ":irc.example.org 001 bob :Welcome to ExampleNet, bob".into(),
        ));
        assert_eq!(
            events,
            vec![Event::Numeric {
                server: "irc.example.org".into(),
                code: 1,
                target: "bob".into(),
                text: "Welcome to ExampleNet, bob".into(),
            }]
        );
    }
}

mod traffic {
    use super::*;

    #[test]
    fn test_ping_pong_keeps_session_alive() {
        let mut conn = new_session();
        conn.connect();
        let _ = conn.apply(Input::Opened);
        let before = conn.transport().wrote.len();

        let events = conn.apply(Input::Line("PING :irc.example.org".into()));
        assert_eq!(
            events,
            vec![Event::Ping {
                server: "irc.example.org".into()
            }]
        );
        assert_eq!(
            conn.transport().wrote[before..],
            ["PONG irc.example.org".to_owned()]
        );
    }

    #[test]
    fn test_channel_conversation() {
        let mut conn = new_session();
        conn.connect();
        let _ = conn.apply(Input::Opened);

        conn.join_channel("#rust", None);
        let _ = conn.apply(Input::Tick);
        assert_eq!(conn.transport().wrote.last().unwrap(), "JOIN #rust");

        let events = conn.apply(Input::Line(":bob!ident@client.example.net JOIN :#rust".into()));
        assert_eq!(
            events,
            vec![Event::JoinedChannel {
                channel: "#rust".into()
            }]
        );

        let events = conn.apply(Input::Line(
            ":alice!a@example.com PRIVMSG #rust :hello bob".into(),
        ));
        assert_eq!(
            events,
            vec![Event::Privmsg {
                from: HostMask::new("alice", "a", "example.com"),
                target: "#rust".into(),
                text: "hello bob".into(),
            }]
        );

        conn.privmsg("#rust", "hi alice");
        let _ = conn.apply(Input::Tick);
        assert_eq!(
            conn.transport().wrote.last().unwrap(),
            "PRIVMSG #rust :hi alice"
        );
    }

    #[test]
    fn test_queue_pacing_is_strict_fifo() {
        let mut conn = new_session();
        conn.connect();
        let _ = conn.apply(Input::Opened);
        let before = conn.transport().wrote.len();

        conn.request_topic("#a");
        conn.set_topic("#b", "new topic");
        conn.request_names("#c");
        assert_eq!(conn.pending(), 3);
        // nothing leaves the queue without a tick
        assert_eq!(conn.transport().wrote.len(), before);

        let _ = conn.apply(Input::Tick);
        assert_eq!(conn.pending(), 2);
        let _ = conn.apply(Input::Tick);
        let _ = conn.apply(Input::Tick);
        assert_eq!(
            conn.transport().wrote[before..],
            [
                "TOPIC #a".to_owned(),
                "TOPIC #b :new topic".to_owned(),
                "NAMES #c".to_owned(),
            ]
        );

        // a tick against an empty queue writes nothing
        let _ = conn.apply(Input::Tick);
        assert_eq!(conn.transport().wrote.len(), before + 3);
    }
}

mod nick_tracking {
    use super::*;

    #[test]
    fn test_nick_change_round_trip() {
        let mut conn = new_session();
        conn.connect();
        let _ = conn.apply(Input::Opened);

        conn.set_nick("bob2");
        assert_eq!(conn.transport().wrote.last().unwrap(), "NICK bob2");
        assert_eq!(conn.nick(), "bob");

        let events = conn.apply(Input::Line(":bob!ident@h NICK :bob2".into()));
        assert_eq!(
            events,
            vec![Event::NickChanged {
                old: "bob".into(),
                new: "bob2".into(),
            }]
        );
        assert_eq!(conn.nick(), "bob2");

        // a second identical echo is no longer a self change
        let events = conn.apply(Input::Line(":bob!ident@h NICK :bob2".into()));
        assert_eq!(
            events,
            vec![Event::Nick {
                from: HostMask::new("bob", "ident", "h"),
                nick: "bob2".into(),
            }]
        );
    }

    #[test]
    fn test_other_users_nick_change() {
        let mut conn = new_session();
        conn.connect();
        let _ = conn.apply(Input::Opened);

        let events = conn.apply(Input::Line(":carol!c@h NICK :carol_away".into()));
        assert_eq!(
            events,
            vec![Event::Nick {
                from: HostMask::new("carol", "c", "h"),
                nick: "carol_away".into(),
            }]
        );
        assert_eq!(conn.nick(), "bob");
    }

    #[test]
    fn test_set_nick_before_connect_is_local() {
        let mut conn = new_session();
        conn.set_nick("prelogin");
        assert_eq!(conn.nick(), "prelogin");
        assert!(conn.transport().wrote.is_empty());
    }
}

mod lifecycle {
    use super::*;

    #[test]
    fn test_reconnect_on_server_change() {
        let mut conn = new_session();
        conn.connect();
        let _ = conn.apply(Input::Opened);
        conn.privmsg("#chan", "queued but never sent");

        conn.set_server(ServerInfo::new("irc.other.net", 6697));
        assert_eq!(conn.transport().disconnects, 1);
        assert_eq!(
            conn.transport().connects,
            vec![
                ("irc.example.org".to_owned(), 6667),
                ("irc.other.net".to_owned(), 6697),
            ]
        );

        // the close confirmation drops the queue
        let events = conn.apply(Input::Closed);
        assert_eq!(
            events,
            vec![Event::Disconnected(ServerInfo::new("irc.other.net", 6697))]
        );
        assert_eq!(conn.pending(), 0);

        let events = conn.apply(Input::Opened);
        assert_eq!(
            events,
            vec![Event::Connected(ServerInfo::new("irc.other.net", 6697))]
        );
    }

    #[test]
    fn test_error_then_close() {
        let mut conn = new_session();
        conn.connect();
        let _ = conn.apply(Input::Opened);

        let events = conn.apply(Input::Error {
            kind: std::io::ErrorKind::ConnectionReset,
            message: "connection reset by peer".into(),
        });
        assert_eq!(
            events,
            vec![Event::SocketError {
                kind: std::io::ErrorKind::ConnectionReset,
                message: "connection reset by peer".into(),
            }]
        );
        // the error alone does not flip the state; the close does
        assert!(conn.is_connected());
        let _ = conn.apply(Input::Closed);
        assert!(!conn.is_connected());
    }

    #[test]
    fn test_quit_and_disconnect() {
        let mut conn = new_session();
        conn.connect();
        let _ = conn.apply(Input::Opened);

        conn.quit("goodbye", true);
        assert_eq!(conn.transport().wrote.last().unwrap(), "QUIT :goodbye");
        assert_eq!(conn.transport().disconnects, 1);
    }

    #[test]
    fn test_commands_after_close_are_dropped() {
        let mut conn = new_session();
        conn.connect();
        let _ = conn.apply(Input::Opened);
        let _ = conn.apply(Input::Closed);

        let before = conn.transport().wrote.len();
        conn.join_channel("#chan", None);
        conn.privmsg("#chan", "hi");
        conn.send_now("ANYTHING");
        let _ = conn.apply(Input::Tick);
        assert_eq!(conn.transport().wrote.len(), before);
    }
}
