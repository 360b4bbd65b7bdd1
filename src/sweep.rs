use crate::{
    blend::MixFactor,
    error::{MorphixError, MorphixResult},
    session::BlendSession,
    sink::FrameSink,
};

/// Inclusive range of mix-factor percents walked in ascending order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SweepRange {
    start: u8,
    end: u8,
    step: u8,
}

impl SweepRange {
    pub fn new(start: u32, end: u32, step: u32) -> MorphixResult<Self> {
        if start > end {
            return Err(MorphixError::validation(format!(
                "sweep start {start} is past end {end}"
            )));
        }
        if end > 100 {
            return Err(MorphixError::validation(format!(
                "sweep end {end} out of range 0..=100"
            )));
        }
        if step == 0 || step > 100 {
            return Err(MorphixError::validation(format!(
                "sweep step {step} out of range 1..=100"
            )));
        }
        Ok(Self {
            start: start as u8,
            end: end as u8,
            step: step as u8,
        })
    }

    /// 0 through 100 inclusive, step 1: the 101-frame default sweep.
    pub fn full() -> Self {
        Self {
            start: 0,
            end: 100,
            step: 1,
        }
    }

    pub fn iter(self) -> impl Iterator<Item = MixFactor> {
        (self.start..=self.end)
            .step_by(self.step as usize)
            .map(MixFactor::from_validated)
    }

    pub fn len(self) -> usize {
        (usize::from(self.end - self.start) / usize::from(self.step)) + 1
    }

    pub fn is_empty(self) -> bool {
        false
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SweepStats {
    pub frames_written: usize,
}

/// Render one frame per mix factor in ascending order, handing each to the
/// sink in that same order, then finish the sink. Any error aborts the run.
#[tracing::instrument(skip(session, sink))]
pub fn run_sweep(
    session: &mut BlendSession,
    range: SweepRange,
    sink: &mut dyn FrameSink,
) -> MorphixResult<SweepStats> {
    let mut stats = SweepStats::default();
    for mix in range.iter() {
        let frame = session.render(mix)?;
        sink.write_frame(mix, frame)?;
        stats.frames_written += 1;
    }
    sink.finish()?;
    tracing::debug!(frames = stats.frames_written, "sweep finished");
    Ok(stats)
}
