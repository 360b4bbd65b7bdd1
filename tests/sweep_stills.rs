use std::path::PathBuf;

use morphix::{
    BlendSession, FrameRGB, FrameSink, MixFactor, MorphixResult, StillSequenceSink, SweepRange,
    run_sweep,
};

fn frame(w: u32, h: u32, px: [u8; 3]) -> FrameRGB {
    FrameRGB::from_raw(w, h, px.repeat((w * h) as usize)).unwrap()
}

fn session() -> BlendSession {
    BlendSession::new(frame(4, 4, [0, 0, 0]), frame(4, 4, [100, 200, 50]), None).unwrap()
}

/// Records the order frames arrive in instead of writing them anywhere.
#[derive(Default)]
struct RecordingSink {
    percents: Vec<u8>,
    finished: usize,
}

impl FrameSink for RecordingSink {
    fn write_frame(&mut self, mix: MixFactor, _frame: &FrameRGB) -> MorphixResult<()> {
        self.percents.push(mix.as_percent());
        Ok(())
    }

    fn finish(&mut self) -> MorphixResult<()> {
        self.finished += 1;
        Ok(())
    }
}

#[test]
fn full_sweep_emits_101_frames_in_ascending_order() {
    let mut sink = RecordingSink::default();
    let stats = run_sweep(&mut session(), SweepRange::full(), &mut sink).unwrap();

    assert_eq!(stats.frames_written, 101);
    assert_eq!(sink.percents.len(), 101);
    assert_eq!(sink.finished, 1);

    let expected: Vec<u8> = (0..=100).collect();
    assert_eq!(sink.percents, expected);
}

#[test]
fn still_sweep_writes_every_zero_padded_artifact() {
    let dir = PathBuf::from("target").join("sweep_stills");
    let _ = std::fs::remove_dir_all(&dir);

    let mut sink = StillSequenceSink::new(&dir, "image", "png").unwrap();
    let stats = run_sweep(&mut session(), SweepRange::full(), &mut sink).unwrap();
    assert_eq!(stats.frames_written, 101);

    for p in 0..=100u32 {
        let path = dir.join(format!("image_{p:03}.png"));
        assert!(path.exists(), "missing {}", path.display());
    }
    assert_eq!(std::fs::read_dir(&dir).unwrap().count(), 101);
}

#[test]
fn sweep_frames_are_the_documented_blend_values() {
    let mut sink = RecordingSink::default();
    let mut sess = session();
    run_sweep(&mut sess, SweepRange::new(50, 50, 1).unwrap(), &mut sink).unwrap();
    assert_eq!(sink.percents, vec![50]);

    let mid = sess.render(MixFactor::HALF).unwrap();
    assert_eq!(mid.pixel(3, 3), Some([50, 100, 25]));
}
