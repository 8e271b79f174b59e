use serde::{Deserialize, Serialize};

/// Inter-marker spacing summary. All spacings are zero when fewer than two
/// markers exist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    pub count: usize,
    pub avg_spacing: f32,
    pub min_spacing: f32,
    pub max_spacing: f32,
}

pub fn calculate(times: &[f32]) -> Statistics {
    if times.len() < 2 {
        return Statistics {
            count: times.len(),
            avg_spacing: 0.0,
            min_spacing: 0.0,
            max_spacing: 0.0,
        };
    }

    let gaps: Vec<f32> = times.windows(2).map(|w| w[1] - w[0]).collect();
    Statistics {
        count: times.len(),
        avg_spacing: gaps.iter().sum::<f32>() / gaps.len() as f32,
        min_spacing: gaps.iter().copied().fold(f32::INFINITY, f32::min),
        max_spacing: gaps.iter().copied().fold(f32::NEG_INFINITY, f32::max),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fewer_than_two_times_zeroes_the_spacings() {
        let empty = calculate(&[]);
        assert_eq!(empty.count, 0);
        assert_eq!(empty.avg_spacing, 0.0);

        let single = calculate(&[7.5]);
        assert_eq!(single.count, 1);
        assert_eq!(single.avg_spacing, 0.0);
        assert_eq!(single.min_spacing, 0.0);
        assert_eq!(single.max_spacing, 0.0);
    }

    #[test]
    fn gaps_are_summarized() {
        let stats = calculate(&[0.0, 1.0, 3.0]);
        assert_eq!(stats.count, 3);
        assert_eq!(stats.avg_spacing, 1.5);
        assert_eq!(stats.min_spacing, 1.0);
        assert_eq!(stats.max_spacing, 2.0);
    }

    #[test]
    fn uniform_spacing_has_equal_min_and_max() {
        let stats = calculate(&[0.0, 0.5, 1.0, 1.5]);
        assert_eq!(stats.min_spacing, stats.max_spacing);
        assert_eq!(stats.avg_spacing, 0.5);
    }
}
