//! Read-only lookup tables for the diurnal distributions and the
//! percent-sunshine cloud model.

/// Upper bound of each precipitation bucket (inches/day).
pub const SUMS: [f64; 12] = [
    0.01, 0.02, 0.04, 0.08, 0.16, 0.32, 0.64, 1.28, 2.56, 5.12, 10.24, 20.48,
];

/// Hourly shape for each bucket: column `i` sums to `SUMS[i]`.
pub const TRIANG: [[f64; 12]; 24] = [
    [0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
    [0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
    [0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
    [0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
    [0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
    [0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
    [0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.01, 0.01],
    [0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.01, 0.01, 0.1, 0.11],
    [0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.01, 0.01, 0.08, 0.09, 0.45, 0.55],
    [0.0, 0.0, 0.0, 0.0, 0.01, 0.01, 0.06, 0.07, 0.28, 0.36, 1.2, 1.65],
    [0.0, 0.0, 0.01, 0.01, 0.04, 0.05, 0.15, 0.21, 0.56, 0.84, 2.1, 3.3],
    [0.01, 0.01, 0.02, 0.03, 0.06, 0.1, 0.2, 0.35, 0.7, 1.26, 2.52, 4.62],
    [0.0, 0.01, 0.01, 0.03, 0.04, 0.1, 0.15, 0.35, 0.56, 1.26, 2.1, 4.62],
    [0.0, 0.0, 0.0, 0.01, 0.01, 0.05, 0.06, 0.21, 0.28, 0.84, 1.2, 3.3],
    [0.0, 0.0, 0.0, 0.0, 0.0, 0.01, 0.01, 0.07, 0.08, 0.36, 0.45, 1.65],
    [0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.01, 0.01, 0.09, 0.1, 0.55],
    [0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.01, 0.01, 0.11],
    [0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.01],
    [0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
    [0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
    [0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
    [0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
    [0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
    [0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
];

/// Default hourly wind distribution (fraction of the daily total).
pub const WIND_CURVE: [f64; 24] = [
    0.034, 0.034, 0.034, 0.034, 0.034, 0.034, 0.034, 0.035, 0.037, 0.041, 0.046, 0.05, 0.053,
    0.054, 0.058, 0.057, 0.056, 0.05, 0.043, 0.04, 0.038, 0.035, 0.035, 0.034,
];

/// Hamon coefficient per month, January first.
pub const HAMON_COEFFICIENTS: [f64; 12] = [0.0055; 12];

/// Day-angle offset (degrees) at the start of each month, January first.
pub const X1: [f64; 12] = [
    10.00028, 41.0003, 69.22113, 100.5259, 130.8852, 161.2853, 191.7178, 222.1775, 253.66,
    281.1629, 309.6838, 341.221,
];

/// Harmonic clear-sky coefficients `[A0, A1, A2, A3, B1, B2]` per whole
/// degree of latitude from 27 to 53; the last row repeats 52 for interpolation.
pub const XLAX: [[f64; 6]; 27] = [
    [616.17, -147.83, -27.17, -3.17, 11.84, 2.02],
    [609.97, -154.71, -27.49, -2.97, 12.04, 1.3],
    [603.69, -161.55, -27.69, -2.78, 12.22, 0.64],
    [597.29, -168.33, -27.78, -2.6, 12.38, 0.02],
    [590.81, -175.05, -27.74, -2.43, 12.53, -0.56],
    [584.21, -181.72, -27.57, -2.28, 12.67, -1.1],
    [577.53, -188.34, -27.29, -2.14, 12.8, -1.6],
    [570.73, -194.91, -26.89, -2.02, 12.92, -2.05],
    [563.85, -201.42, -26.37, -1.91, 13.03, -2.45],
    [556.85, -207.29, -25.72, -1.81, 13.13, -2.8],
    [549.77, -214.29, -24.96, -1.72, 13.22, -3.1],
    [542.57, -220.65, -24.07, -1.64, 13.3, -3.35],
    [535.3, -226.96, -23.07, -1.59, 13.36, -3.58],
    [527.9, -233.22, -21.95, -1.55, 13.4, -3.77],
    [520.44, -239.43, -20.7, -1.52, 13.42, -3.92],
    [512.84, -245.59, -19.33, -1.51, 13.42, -4.03],
    [505.19, -251.69, -17.83, -1.51, 13.41, -4.1],
    [497.4, -257.74, -16.22, -1.52, 13.39, -4.13],
    [489.52, -263.74, -14.49, -1.54, 13.36, -4.12],
    [481.53, -269.7, -12.63, -1.57, 13.32, -4.07],
    [473.45, -275.6, -10.65, -1.63, 13.27, -3.98],
    [465.27, -281.45, -8.55, -1.71, 13.21, -3.85],
    [456.99, -287.25, -6.33, -1.8, 13.14, -3.68],
    [448.61, -292.99, -3.98, -1.9, 13.07, -3.47],
    [440.14, -298.68, -1.51, -2.01, 13.0, -3.3],
    [431.55, -304.32, 1.08, -2.13, 12.92, -3.17],
    [431.55, -304.32, 1.08, -2.13, 12.92, -3.17],
];

/// Monthly correction to the percent-sunshine fit, indexed by sunshine
/// bucket `ceil((SS + 10) / 10)` then month (January first).
pub const SUNSHINE_CORRECTION: [[f64; 12]; 11] = [
    [0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
    [4.0, 2.0, -1.5, -3.0, -2.0, 1.0, 3.0, 2.5, 1.0, 1.0, 2.0, 1.0],
    [3.0, 4.0, 0.0, -3.0, -2.5, 0.0, 2.0, 3.0, 2.0, 1.5, 2.0, 1.0],
    [0.0, 3.5, 1.5, -1.0, -2.0, -1.0, 1.5, 3.0, 3.0, 1.5, 2.0, 1.0],
    [-2.0, 2.5, 3.5, 0.0, -2.0, -1.0, 0.5, 3.0, 3.0, 2.0, 2.0, 1.0],
    [-4.0, 0.5, 3.0, 1.0, -0.5, -1.0, 0.0, 2.0, 2.5, 2.5, 2.0, 1.0],
    [-5.0, -1.5, 2.0, 3.0, 0.5, -1.0, -0.5, 1.0, 2.5, 2.5, 2.0, 1.0],
    [-5.0, -3.5, 1.0, 3.0, 1.5, 0.0, -0.5, 1.0, 2.0, 2.0, 2.0, 1.0],
    [-4.0, -4.5, -1.0, 2.5, 3.0, 1.0, 0.0, 0.0, 1.5, 2.0, 2.0, 1.0],
    [-2.0, -4.0, -3.0, 1.0, 3.0, 2.0, 0.5, 0.0, 1.5, 2.0, 1.0, 1.0],
    [0.0, -3.5, -4.0, -0.5, 3.0, 3.0, 1.5, 1.0, 1.0, 2.0, 1.0, 1.0],
];

/// First latitude covered by `XLAX`.
pub const XLAX_FIRST_LATITUDE: usize = 27;
