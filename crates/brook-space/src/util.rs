//! Small numeric helpers shared by grid construction.

/// `n` evenly spaced values from `min` to `max` inclusive.
///
/// `n == 0` gives an empty vector and `n == 1` gives `[min]`.
///
/// # Examples
///
/// ```
/// use brook_space::linspace;
///
/// assert_eq!(linspace(0.0, 1.0, 5), vec![0.0, 0.25, 0.5, 0.75, 1.0]);
/// assert_eq!(linspace(3.0, 7.0, 1), vec![3.0]);
/// ```
pub fn linspace(min: f64, max: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![min],
        _ => {
            let step = (max - min) / (n - 1) as f64;
            (0..n)
                .map(|i| if i == n - 1 { max } else { min + step * i as f64 })
                .collect()
        }
    }
}

/// Cell-centre coordinates of `n` cells of width `dh` whose lower face is
/// at `origin`.
pub fn cell_centres(origin: f64, dh: f64, n: usize) -> Vec<f64> {
    if n == 0 {
        return Vec::new();
    }
    let half = 0.5 * dh;
    linspace(origin + half, origin + (n as f64 - 0.5) * dh, n)
}
