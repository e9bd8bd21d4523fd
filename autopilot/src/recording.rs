use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use twenty48::Direction;

/// Collects per-move records and flushes them as one JSON file per session.
pub struct Recorder {
    directory: PathBuf,
    seed: u64,
    moves: Vec<MoveRecord>,
}

impl Recorder {
    pub fn new(directory: PathBuf, seed: u64) -> anyhow::Result<Self> {
        if !directory.is_dir() {
            anyhow::bail!("Directory '{}' does not exist", directory.display());
        }
        Ok(Self {
            directory,
            seed,
            moves: Vec::new(),
        })
    }

    pub fn store_move(&mut self, direction: Direction, highest_value: u32) {
        self.moves.push(MoveRecord {
            move_idx: self.moves.len() + 1,
            direction,
            highest_value,
        });
    }

    pub fn write_session_recording(&mut self) -> anyhow::Result<()> {
        let filepath = self.directory.join(format!("session_{}.json", self.seed));
        let writer = BufWriter::new(File::create(filepath)?);
        let recording = SessionRecording {
            seed: self.seed,
            moves: std::mem::take(&mut self.moves),
        };
        serde_json::to_writer_pretty(writer, &recording)?;
        Ok(())
    }
}

#[derive(Serialize, Deserialize)]
pub struct SessionRecording {
    seed: u64,
    moves: Vec<MoveRecord>,
}

#[derive(Serialize, Deserialize)]
pub struct MoveRecord {
    move_idx: usize,
    direction: Direction,
    highest_value: u32,
}
