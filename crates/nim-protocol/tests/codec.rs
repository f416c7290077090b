// crates/nim-protocol/tests/codec.rs
use nim_core::{Board, Move};
use nim_protocol::wire_types::{
    MAX_LISTING_LEN, MESSAGE_FRAME_LEN, QUERY_RESPONSE_HEADER_LEN, TEXT_FIELD_LEN,
};
use nim_protocol::{
    decode_board, decode_message, decode_move, decode_query, decode_query_response, encode_board,
    encode_message, encode_move, encode_query, encode_query_response, BootstrapError,
    BootstrapRecord, FrameStream, Message, MessageType, ProtocolError, Query, QueryResponse,
};

#[test]
fn message_frame_layout_is_tag_then_padded_payload() {
    let frame = encode_message(&Message::handle("alice")).unwrap();
    assert_eq!(frame.len(), MESSAGE_FRAME_LEN);
    assert_eq!(frame[0], b'R');
    assert_eq!(&frame[1..6], b"alice");
    assert!(frame[6..].iter().all(|&b| b == 0));
}

#[test]
fn every_message_type_survives_the_wire() {
    let messages = [
        Message::password("hunter2"),
        Message::rejected(),
        Message::handle_request(),
        Message::handle("exactly-twenty-bytes"),
        Message::move_request(),
        Message::filler(),
        Message::win(),
        Message::loss(),
    ];
    for msg in messages {
        let frame = encode_message(&msg).unwrap();
        assert_eq!(decode_message(&frame).unwrap(), msg);
        assert_eq!(frame[0] as char, msg.kind.as_char());
    }
}

#[test]
fn oversized_payload_is_rejected_not_truncated() {
    let err = encode_message(&Message::handle("twenty-one-bytes-long")).unwrap_err();
    assert_eq!(
        err,
        ProtocolError::FieldTooLong {
            field: "payload",
            len: 21
        }
    );
}

#[test]
fn unknown_tag_and_short_frames_fail_to_decode() {
    let mut frame = [0u8; MESSAGE_FRAME_LEN];
    frame[0] = b'Q';
    assert_eq!(
        decode_message(&frame),
        Err(ProtocolError::UnknownMessageType(b'Q'))
    );

    assert_eq!(
        decode_message(&frame[..10]),
        Err(ProtocolError::Truncated {
            expected: MESSAGE_FRAME_LEN,
            actual: 10
        })
    );
}

#[test]
fn board_frame_uses_o_and_x_markers() {
    let mut board = Board::new();
    assert_eq!(&encode_board(&board), b"OXXXXXXOOOXXXXOOOOOXXOOOOOOO");

    board.apply(Move::take(3, 2)).unwrap();
    let frame = encode_board(&board);
    assert_eq!(&frame[14..21], b"OXXXXXX");
    assert_eq!(decode_board(&frame).unwrap(), board);
}

#[test]
fn board_decode_rejects_bad_markers_and_gaps() {
    let mut frame = encode_board(&Board::new());
    frame[0] = b'?';
    assert_eq!(
        decode_board(&frame),
        Err(ProtocolError::InvalidField("board cell"))
    );

    let mut frame = encode_board(&Board::new());
    frame[21] = b'X'; // row 4 now starts with a hole
    assert_eq!(
        decode_board(&frame),
        Err(ProtocolError::InvalidField("board layout"))
    );
}

#[test]
fn move_frame_is_two_ascii_digits() {
    assert_eq!(encode_move(Move::take(4, 1)).unwrap(), *b"41");
    assert_eq!(encode_move(Move::Resign).unwrap(), *b"00");
    assert_eq!(decode_move(b"00").unwrap(), Move::Resign);
    assert_eq!(decode_move(b"27").unwrap(), Move::take(2, 7));

    // Out-of-range digits still decode; the rules reject them later.
    assert_eq!(decode_move(b"90").unwrap(), Move::take(9, 0));

    assert_eq!(
        decode_move(b"a1"),
        Err(ProtocolError::InvalidField("move digit"))
    );
    assert!(encode_move(Move::take(12, 1)).is_err());
}

#[test]
fn query_carries_only_the_password() {
    let frame = encode_query(&Query::new("secret")).unwrap();
    assert_eq!(frame.len(), TEXT_FIELD_LEN);
    assert_eq!(decode_query(&frame).unwrap(), Query::new("secret"));

    let empty = encode_query(&Query::default()).unwrap();
    assert!(empty.iter().all(|&b| b == 0));
    assert_eq!(decode_query(&empty).unwrap().password, "");

    assert!(decode_query(&frame[..8]).is_err());
}

#[test]
fn query_response_layout_is_count_handle_listing() {
    let resp = QueryResponse::from_pairings(2, "carol", [("alice", "bob"), ("dave", "erin")]);
    assert_eq!(resp.games, "alice:bob:dave:erin:");

    let mut buf = Vec::new();
    encode_query_response(&resp, &mut buf).unwrap();

    assert_eq!(&buf[0..4], &[0, 0, 0, 2]);
    assert_eq!(&buf[4..9], b"carol");
    assert!(buf[9..QUERY_RESPONSE_HEADER_LEN].iter().all(|&b| b == 0));
    assert_eq!(&buf[QUERY_RESPONSE_HEADER_LEN..], b"alice:bob:dave:erin:");

    let decoded = decode_query_response(&buf).unwrap();
    assert_eq!(decoded, resp);
    assert_eq!(decoded.waiting(), Some("carol"));
    assert_eq!(
        decoded.pairings(),
        vec![
            ("alice".to_string(), "bob".to_string()),
            ("dave".to_string(), "erin".to_string())
        ]
    );
}

#[test]
fn empty_census_encodes_to_bare_header() {
    let resp = QueryResponse::default();
    let mut buf = Vec::new();
    encode_query_response(&resp, &mut buf).unwrap();
    assert_eq!(buf.len(), QUERY_RESPONSE_HEADER_LEN);

    let decoded = decode_query_response(&buf).unwrap();
    assert_eq!(decoded.in_progress, 0);
    assert_eq!(decoded.waiting(), None);
    assert!(decoded.pairings().is_empty());
}

#[test]
fn oversized_listing_is_refused() {
    let resp = QueryResponse {
        in_progress: 1,
        waiting: String::new(),
        games: "x".repeat(MAX_LISTING_LEN + 1),
    };
    let mut buf = Vec::new();
    assert!(matches!(
        encode_query_response(&resp, &mut buf),
        Err(ProtocolError::FieldTooLong { field: "games", .. })
    ));
}

#[test]
fn bootstrap_record_round_trips_and_rejects_junk() {
    let record = BootstrapRecord::new("nimhost", 4201, 4202);
    assert_eq!(record.to_string(), "nimhost:4201:4202");
    assert_eq!("nimhost:4201:4202\n".parse::<BootstrapRecord>().unwrap(), record);
    assert_eq!(record.query_addr(), "nimhost:4201");
    assert_eq!(record.play_addr(), "nimhost:4202");

    assert_eq!(
        "nimhost:4201".parse::<BootstrapRecord>(),
        Err(BootstrapError::MissingField("host"))
    );
    assert_eq!(
        "nimhost:4201:play".parse::<BootstrapRecord>(),
        Err(BootstrapError::InvalidPort("play".to_string()))
    );
    assert!("".parse::<BootstrapRecord>().is_err());
}

#[tokio::test]
async fn frame_stream_moves_whole_frames_in_order() {
    let (left, right) = tokio::io::duplex(8);
    let mut server = FrameStream::new(left);
    let mut client = FrameStream::new(right);

    let writer = tokio::spawn(async move {
        server.send_message(&Message::handle("alice")).await.unwrap();
        server.send_board(&Board::new()).await.unwrap();
        server.send_message(&Message::move_request()).await.unwrap();
        let mv = server.recv_move().await.unwrap();
        (server, mv)
    });

    // The duplex buffer is smaller than any frame, so every frame crosses
    // in several pieces.
    let announced = client.recv_message().await.unwrap();
    assert_eq!(announced, Message::handle("alice"));
    assert_eq!(client.recv_board().await.unwrap(), Board::new());
    assert_eq!(
        client.recv_message().await.unwrap().kind,
        MessageType::MoveRequest
    );
    client.send_move(Move::take(2, 3)).await.unwrap();

    let (_server, mv) = writer.await.unwrap();
    assert_eq!(mv, Move::take(2, 3));
}

#[tokio::test]
async fn peer_closing_mid_frame_is_a_disconnect() {
    use tokio::io::AsyncWriteExt;

    let (left, mut right) = tokio::io::duplex(64);
    let mut reader = FrameStream::new(left);

    right.write_all(b"R").await.unwrap();
    drop(right);

    let err = reader.recv_message().await.unwrap_err();
    assert!(err.is_disconnect());
}
