/// Something that advances by discrete, cooperative steps until it reaches a terminal state:
/// a [FrontierSearch](crate::search::FrontierSearch) or a [MazeCarver](crate::maze::MazeCarver).
///
/// It can be driven either synchronously with [drain](Self::drain) or by an external
/// scheduler (timer, game loop, test harness) calling [tick](Self::tick) once per tick.
pub trait Stepper {
    /// Performs one iteration and returns whether a terminal state has been reached.
    /// Stepping in a terminal state does nothing and returns [true].
    fn step(&mut self) -> bool;

    fn is_finished(&self) -> bool;

    /// Steps until a terminal state is reached and returns the number of steps taken.
    fn drain(&mut self) -> usize {
        let mut steps = 0;
        while !self.is_finished() {
            self.step();
            steps += 1;
        }
        steps
    }

    /// Performs exactly one step followed by one call to `render`. Returns [true] once the
    /// terminal state is reached, at which point the driving timer should be cancelled.
    fn tick<F>(&mut self, mut render: F) -> bool
    where
        Self: Sized,
        F: FnMut(&Self),
    {
        let finished = self.step();
        render(self);
        finished
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Countdown(u32);

    impl Stepper for Countdown {
        fn step(&mut self) -> bool {
            self.0 = self.0.saturating_sub(1);
            self.is_finished()
        }
        fn is_finished(&self) -> bool {
            self.0 == 0
        }
    }

    #[test]
    fn drain_counts_steps() {
        let mut countdown = Countdown(3);
        assert_eq!(countdown.drain(), 3);
        assert_eq!(countdown.drain(), 0);
    }

    #[test]
    fn tick_renders_once_per_step() {
        let mut countdown = Countdown(2);
        let mut frames = vec![];
        while !countdown.tick(|c| frames.push(c.0)) {}
        assert_eq!(frames, vec![1, 0]);
    }
}
