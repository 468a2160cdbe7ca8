//! Helpers shared between solutions

pub mod grid;
pub mod range;

use aoc_solver::AnimationStep;

/// Where animation steps go; `None` when solving without animation
pub type StepSink<'s> = Option<&'s mut dyn FnMut(AnimationStep)>;

/// Build a step and hand it to the sink, if there is one
///
/// The step is only constructed when someone listens, so the plain solve
/// path never renders grids or formats descriptions.
pub(crate) fn emit(on_step: &mut StepSink<'_>, step: impl FnOnce() -> AnimationStep) {
    if let Some(sink) = on_step.as_deref_mut() {
        sink(step());
    }
}

/// Whether the `index`-th iteration of a long loop should emit an animation step
///
/// Reports the first few iterations, then thins out to every hundredth.
pub(crate) fn is_sampled_step(index: usize) -> bool {
    index < 10 || index % 100 == 0
}
