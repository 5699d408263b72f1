use std::{
    io::Write,
    sync::{Arc, Mutex},
};

use goro_cli::Session;
use goro_engine::{MOVE_GEN, MoveGen, Position, Snapshot};
use testresult::TestResult;

#[derive(Clone, Debug, Default)]
struct ResponseSaver {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl ResponseSaver {
    fn get_new_responses(&self) -> Vec<String> {
        let mut buffer = self.buffer.lock().unwrap();
        let text = String::from_utf8(buffer.clone()).unwrap();
        buffer.clear();
        text.lines().map(str::to_string).collect()
    }
}

impl Write for ResponseSaver {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.buffer.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

fn new_session() -> (Session<MoveGen, ResponseSaver>, ResponseSaver) {
    let saver = ResponseSaver::default();
    (Session::new(MOVE_GEN, saver.clone()), saver)
}

#[test]
fn test_happy_path() -> TestResult {
    let (mut session, saver) = new_session();

    session.handle_command("show")?;
    let responses = saver.get_new_responses();
    assert_eq!(responses.len(), 1);
    assert!(responses[0].starts_with("error: no game in progress"));

    session.handle_command("newgame")?;
    session.handle_command("sfen")?;
    assert_eq!(
        saver.get_new_responses(),
        vec!["cdldc/5/1ppp1/1PPP1/5/CDLDC b - 1"]
    );

    session.handle_command("moves")?;
    let responses = saver.get_new_responses();
    assert_eq!(responses.len(), 17);
    assert_eq!(responses.last().map(String::as_str), Some("total: 16"));

    let c3c4 = responses
        .iter()
        .find_map(|line| line.strip_suffix(": c3c4"))
        .expect("c3c4 should be listed")
        .to_string();
    session.handle_command(&format!("play {}", c3c4))?;
    assert_eq!(saver.get_new_responses(), vec!["played c3c4 (ongoing)"]);

    session.handle_command("status")?;
    assert_eq!(
        saver.get_new_responses(),
        vec!["status ongoing, move 2, Second to move"]
    );

    session.handle_command("export")?;
    let responses = saver.get_new_responses();
    let snapshot: Snapshot = serde_json::from_str(&responses[0])?;
    let position = Position::try_from(snapshot)?;
    assert_eq!(position.to_sfen(), "cdldc/5/1pPp1/1P1P1/5/CDLDC w P 2");

    session.handle_command("quit")?;
    assert!(session.has_quit());
    Ok(())
}

#[test]
fn test_play_to_checkmate() -> TestResult {
    let (mut session, saver) = new_session();

    session.handle_command("position sfen lp2d/5/DD3/5/5/4L b - 1")?;
    session.handle_command("moves")?;
    let a4a5 = saver
        .get_new_responses()
        .iter()
        .find_map(|line| line.strip_suffix(": a4a5").map(str::to_string))
        .expect("a4a5 should be listed");

    session.handle_command(&format!("play {}", a4a5))?;
    assert_eq!(saver.get_new_responses(), vec!["played a4a5 (first wins)"]);

    session.handle_command("play 0")?;
    assert_eq!(
        saver.get_new_responses(),
        vec!["error: game is already over, winner: First"]
    );

    session.handle_command("moves")?;
    assert_eq!(saver.get_new_responses(), vec!["total: 0"]);

    session.handle_command("newgame")?;
    session.handle_command("status")?;
    assert_eq!(
        saver.get_new_responses(),
        vec!["status ongoing, move 1, First to move"]
    );
    Ok(())
}

#[test]
fn test_errors_keep_session_alive() -> TestResult {
    let (mut session, saver) = new_session();

    assert!(session.handle_command("go infinite").is_err());

    session.handle_command("position sfen not-an-sfen")?;
    let responses = saver.get_new_responses();
    assert!(responses[0].starts_with("error: invalid sfen"));

    session.handle_command("position startpos")?;
    session.handle_command("play 99")?;
    assert_eq!(
        saver.get_new_responses(),
        vec!["error: no move at index 99, 16 legal moves"]
    );

    session.handle_command("perft 1")?;
    let responses = saver.get_new_responses();
    assert_eq!(responses.len(), 17);
    assert_eq!(responses.last().map(String::as_str), Some("total: 16"));
    Ok(())
}

#[test]
fn test_status_reports_checkers() -> TestResult {
    let (mut session, saver) = new_session();

    session.handle_command("position sfen 4l/5/5/5/1p3/1L3 b - 1")?;
    session.handle_command("status")?;
    assert_eq!(
        saver.get_new_responses(),
        vec!["status ongoing, move 1, First to move, in check from b2"]
    );
    Ok(())
}
