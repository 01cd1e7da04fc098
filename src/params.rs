//! Calibration constants of the three behavioral types.
//!
//! The triples come from linear-response regressions of the underlying
//! experimental data, one per calibrated treatment (10P, 40P, Level,
//! Impact). The Control treatment is excluded from the canonical averages.

/// Linear-response calibration of one behavioral type under one treatment.
#[derive(Debug, Clone, Copy)]
pub struct Calibration {
    pub intercept: f64,
    pub slope: f64,
    pub first_round: f64,
}

/// Canonical parameter set of one behavioral type.
///
/// The arithmetic mean of the four treatment calibrations, evaluated at
/// compile time. `first_round` is the baseline contribution of round 1;
/// `intercept` and `slope` drive the response in every later round.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TypeParameters {
    pub intercept: f64,
    pub slope: f64,
    pub first_round: f64,
}

// Treatment order: 10P, 40P, Level, Impact.
const UNCONDITIONAL_COOPERATOR_CALIBRATIONS: [Calibration; 4] = [
    Calibration {
        intercept: 17.51459397,
        slope: -0.065673995,
        first_round: 14.72727273,
    },
    Calibration {
        intercept: 16.78084913,
        slope: 0.006177229,
        first_round: 14.2967033,
    },
    Calibration {
        intercept: 18.70653308,
        slope: -0.020941855,
        first_round: 15.5375,
    },
    Calibration {
        intercept: 17.3972948,
        slope: -0.02865642,
        first_round: 14.79746835,
    },
];

const CONDITIONAL_COOPERATOR_CALIBRATIONS: [Calibration; 4] = [
    Calibration {
        intercept: 2.668407923,
        slope: 0.769928283,
        first_round: 12.78333333,
    },
    Calibration {
        intercept: 1.984160769,
        slope: 0.80767842,
        first_round: 12.04081633,
    },
    Calibration {
        intercept: -2.658563959,
        slope: 1.051772529,
        first_round: 12.11538462,
    },
    Calibration {
        intercept: 1.269983166,
        slope: 0.832255046,
        first_round: 10.85185185,
    },
];

const FREE_RIDER_CALIBRATIONS: [Calibration; 4] = [
    Calibration {
        intercept: 4.562105652,
        slope: 0.161445329,
        first_round: 9.666666667,
    },
    Calibration {
        intercept: 0.623097156,
        slope: 0.333341747,
        first_round: 5.714285714,
    },
    Calibration {
        intercept: 4.182532558,
        slope: 0.171781389,
        first_round: 15.0,
    },
    Calibration {
        intercept: 7.031233664,
        slope: -0.129197627,
        first_round: 8.333333333,
    },
];

pub const UNCONDITIONAL_COOPERATOR: TypeParameters =
    average(&UNCONDITIONAL_COOPERATOR_CALIBRATIONS);
pub const CONDITIONAL_COOPERATOR: TypeParameters = average(&CONDITIONAL_COOPERATOR_CALIBRATIONS);
pub const FREE_RIDER: TypeParameters = average(&FREE_RIDER_CALIBRATIONS);

const fn average(calibrations: &[Calibration; 4]) -> TypeParameters {
    let n = calibrations.len();
    let mut intercept = 0.0;
    let mut slope = 0.0;
    let mut first_round = 0.0;

    let mut idx = 0;
    while idx < n {
        intercept += calibrations[idx].intercept;
        slope += calibrations[idx].slope;
        first_round += calibrations[idx].first_round;
        idx += 1;
    }

    TypeParameters {
        intercept: intercept / n as f64,
        slope: slope / n as f64,
        first_round: first_round / n as f64,
    }
}
