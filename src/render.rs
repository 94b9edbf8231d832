//! Console rendering — a grid dump of a timeline, one row per channel.
//!
//! Uses the sampler read-only, so a timeline can be rendered while playback
//! reuses it across cycles; neither writes to it.

use crossterm::style::Stylize;

use crate::gait::Timeline;
use crate::playback::sample;

/// Sample every channel across `0..step_count` and return the amplitude
/// grid, row index = channel number.
pub fn render_rows(timeline: &Timeline, step_count: u32) -> Vec<Vec<u32>> {
    timeline
        .channels()
        .iter()
        .map(|channel| {
            let mut cursor = 0;
            (0..step_count)
                .map(|t| {
                    let (amplitude, next) = sample(channel, cursor, t);
                    cursor = next;
                    amplitude
                })
                .collect()
        })
        .collect()
}

/// Print the grid with zero-padded channel labels; zeros are dimmed so the
/// active periods stand out.
pub fn print_timeline(timeline: &Timeline, step_count: u32) {
    let pad = digits(timeline.channel_count());
    println!();
    for (index, row) in render_rows(timeline, step_count).iter().enumerate() {
        print!("{index:0pad$} >  ");
        for &amplitude in row {
            if amplitude == 0 {
                print!("{} ", amplitude.to_string().dark_grey());
            } else {
                print!("{amplitude} ");
            }
        }
        println!();
    }
    println!();
}

fn digits(n: usize) -> usize {
    n.max(1).to_string().len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GaitConfig;
    use crate::gait::parse_str;

    #[test]
    fn rows_match_sampled_traces() {
        let text = "0 2 2, 4 1 6, 8 2 8\n3 4 4, 0 2 2, 4 1 6, 8 4 8\n2 3 1, 6 2 9\n";
        let out = parse_str(text, &GaitConfig::default());
        let rows = render_rows(&out.timeline, out.step_count);

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0], vec![2, 2, 0, 0, 6, 0, 0, 0, 8, 8]);
        // channel 1 lists [3 4 4] before [0 2 2]; the forward-only scan
        // reaches the out-of-order interval first and the earlier one never
        // plays
        assert_eq!(rows[1], vec![0, 0, 0, 4, 4, 4, 4, 0, 8, 8]);
        assert_eq!(rows[2], vec![0, 0, 1, 1, 1, 0, 9, 9, 0, 0]);
    }

    #[test]
    fn empty_timeline_renders_no_rows() {
        let rows = render_rows(&Timeline::new(), 10);
        assert!(rows.is_empty());
    }

    #[test]
    fn digit_padding() {
        assert_eq!(digits(0), 1);
        assert_eq!(digits(9), 1);
        assert_eq!(digits(10), 2);
    }
}
