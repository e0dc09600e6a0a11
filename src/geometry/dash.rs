//! Custom dash normalisation.
//!
//! Canvas dashes are absolute pixel lengths; DrawingML `a:ds` stops are
//! percentages of the line width.

use smallvec::SmallVec;

/// One `(dash, space)` pair as a percentage of the line width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DashStop {
    pub dash: u32,
    pub space: u32,
}

/// Convert absolute dash lengths into width-relative stops.
///
/// A width below 1 is treated as 1. An odd-length list is repeated once so
/// every dash gets a space.
pub fn normalize_dashes(dashes: &[i32], line_width: i32) -> SmallVec<[DashStop; 4]> {
    let width = line_width.max(1) as f64;
    let pct = |len: i32| (len.max(0) as f64 / width * 100.0).round() as u32;

    let doubled;
    let lengths: &[i32] = if dashes.len() % 2 == 1 {
        doubled = [dashes, dashes].concat();
        &doubled
    } else {
        dashes
    };

    lengths
        .chunks_exact(2)
        .map(|pair| DashStop {
            dash: pct(pair[0]),
            space: pct(pair[1]),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_width_relative() {
        let stops = normalize_dashes(&[20, 10], 10);
        assert_eq!(stops.as_slice(), &[DashStop { dash: 200, space: 100 }]);
    }

    #[test]
    fn test_rounding_and_zero_width() {
        let stops = normalize_dashes(&[1, 2], 3);
        assert_eq!(stops[0], DashStop { dash: 33, space: 67 });

        let stops = normalize_dashes(&[4, 1], 0);
        assert_eq!(stops[0], DashStop { dash: 400, space: 100 });
    }

    #[test]
    fn test_odd_list_repeats() {
        let stops = normalize_dashes(&[10, 5, 20], 5);
        assert_eq!(
            stops.as_slice(),
            &[
                DashStop { dash: 200, space: 100 },
                DashStop { dash: 400, space: 200 },
                DashStop { dash: 100, space: 400 },
            ]
        );
        assert!(normalize_dashes(&[], 4).is_empty());
    }
}
