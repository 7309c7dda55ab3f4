use std::path::PathBuf;

use microday_core::{Config, DayFile, Loaded};

use crate::clock;
use crate::display::Painter;

/// Print the day document with the current item marked.
pub fn run(file: Option<PathBuf>, plain: bool) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let now = clock::now();
    let day_file = DayFile::new(super::day_path(&config, file, now.date())?);

    match day_file.open(&config.files.fallbacks, now.date())? {
        Loaded::Found { mut timeline, .. } => {
            timeline.select_starting_point(now);
            let painter = Painter::new(config.ui.colors && !plain);
            print!("{}", painter.document(&timeline));
            Ok(())
        }
        Loaded::Missing => {
            Err(format!("no day document at {}", day_file.path().display()).into())
        }
    }
}
