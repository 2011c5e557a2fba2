use std::{
    fs,
    path::PathBuf,
    time::{SystemTime, UNIX_EPOCH},
};

use engine::TimeMachine;

fn unique_temp_json_path(tag: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    std::env::temp_dir().join(format!(
        "tiles2048_engine_timemachine_{tag}_{}_{nanos}.json",
        std::process::id()
    ))
}

#[test]
fn timemachine_save_and_load_roundtrips_history_and_frame() {
    let mut tm = TimeMachine::new(vec![0u32]);
    tm.record(vec![0, 2]);
    tm.record(vec![0, 2, 4]);

    // Rewind and branch so the saved file carries the truncated history.
    tm.rewind(1);
    tm.record(vec![8]);

    assert_eq!(tm.frame(), 2);
    assert_eq!(tm.history(), &[vec![0], vec![0, 2], vec![8]]);

    let out = unique_temp_json_path("roundtrip");
    tm.save_json_file(&out).expect("save timemachine json");

    let loaded = TimeMachine::<Vec<u32>>::load_json_file(&out).expect("load timemachine json");
    assert_eq!(loaded.frame(), tm.frame());
    assert_eq!(loaded.history(), tm.history());
    assert_eq!(loaded.state(), tm.state());

    let _ = fs::remove_file(out);
}

#[test]
fn timemachine_load_rejects_frame_outside_history() {
    let out = unique_temp_json_path("bad_frame");
    fs::write(&out, r#"{"states":[1,2],"frame":5}"#).expect("write fixture");

    let err = TimeMachine::<i32>::load_json_file(&out).expect_err("frame 5 is out of range");
    assert_eq!(err.kind(), std::io::ErrorKind::InvalidData);

    let _ = fs::remove_file(out);
}

#[test]
fn timemachine_load_reports_missing_file() {
    let out = unique_temp_json_path("missing");
    let err = TimeMachine::<i32>::load_json_file(&out).expect_err("file does not exist");
    assert_eq!(err.kind(), std::io::ErrorKind::NotFound);
}
