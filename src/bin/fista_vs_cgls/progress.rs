/// Progress bars for the solver iterations
pub (super) struct Progress {
    _bars: MultiProgress,
    fista: ProgressBar,
    cgls: ProgressBar,
}

impl Progress {

    pub (super) fn new(iterations: usize) -> Self {
        let bars = MultiProgress::new();
        let style = ProgressStyle::default_bar()
            .template("{prefix:>5} [{elapsed_precise}] {wide_bar} {pos}/{len}")
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        let bar = |name: &'static str| {
            let bar = bars.add(ProgressBar::new(iterations as u64));
            bar.set_style(style.clone());
            bar.set_prefix(name);
            bar
        };
        let fista = bar("FISTA");
        let cgls  = bar("CGLS");
        Self { _bars: bars, fista, cgls }
    }

    pub (super) fn iteration(&self, solver: &str, iteration: usize) {
        let bar = match solver {
            "FISTA" => &self.fista,
            _       => &self.cgls,
        };
        bar.set_position(iteration as u64);
    }

    pub (super) fn finish(&self) {
        self.fista.finish();
        self.cgls.finish();
    }

}

// ----- Imports -----------------------------------------------------------------------------------------
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
