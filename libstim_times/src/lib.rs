//! # stim_times
//!
//! stim_times rebuilds the timeline of auditory stimulus presentations in a recording
//! session, written in Rust. It takes the trigger pulses recorded by jill into a Bark
//! sampled dataset, the jstim log naming each stimulus as it was queued, and the WAV files
//! that were played, and combines them into a single Bark event dataset of
//! `name`, `start`, `stop` intervals.
//!
//! ## Installation
//!
//! Currently the only method of install is from source. If you have not used Rust before,
//! see the [Rust docs](https://www.rust-lang.org/tools/install) for toolchain installation
//! instructions. To build and install the CLI use `cargo install --path ./stim_times_cli`
//! from the top level stim_times repository.
//!
//! ## How it works
//!
//! 1. The trigger channel of the pulse dataset is binarized against a threshold (20000 by
//! default, sized for 16-bit ADCs). Every sample where the trace goes from below to
//! at-or-above the threshold is an onset; its time is the sample index divided by the
//! sampling rate. There is no debouncing, and a trace that is already high at the first
//! sample does not produce an onset there.
//! 2. Every log line containing `next stim: ` contributes one stimulus name, taken from the
//! fifth whitespace separated token. Other lines are ignored.
//! 3. Each WAV file contributes a duration (frames / sample rate) under its file name with
//! directory and extension removed. If two files share a name the last one given wins and
//! a warning is logged.
//! 4. Onsets and names are zipped in order. Each pair becomes an interval that starts at the
//! onset and stops one stimulus duration later. Extra onsets or names are dropped.
//!
//! **The pairing is positional.** The log must list stimuli in exactly the order the
//! triggers fired, with nothing missing or extra on either side. A lost trigger pulse or a
//! stray log line silently shifts every later stimulus; stim_times has no way to detect this.
//!
//! ## Configuration
//!
//! The threshold and log format can be controlled with a YAML file:
//!
//! ```yml
//! threshold: 20000.0
//! log_marker: 'next stim: '
//! stim_token: 4
//! ```
//!
//! Missing keys take the defaults shown above.
//!
//! ## Data Formats
//!
//! ```text
//! pulse.dat            - raw interleaved samples (time x channel)
//! pulse.dat.meta.yaml  - sampling_rate, dtype, n_channels
//!
//! stim_times.csv           - start,name,stop
//! stim_times.csv.meta.yaml - datatype: 2001, columns (name: null units, start/stop: s)
//! ```
pub mod aligner;
pub mod config;
pub mod constants;
pub mod duration_table;
pub mod error;
pub mod event_dataset;
pub mod process;
pub mod sampled_dataset;
pub mod stim_log;
pub mod trigger;
pub mod wav_file;
