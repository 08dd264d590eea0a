//! Session behaviour against generated CSV files.

use std::fmt::Write as _;
use std::fs;
use std::path::PathBuf;

use approx::assert_abs_diff_eq;
use ff5::data::{DataPaths, DataSet};
use ff5::model::{Factor, FactorInputs, InputBounds, ModelError};
use ff5::{PredictionSession, SessionError};
use rstest::rstest;

const MONTHS: usize = 36;

fn factor_value(t: usize, k: usize) -> f64 {
    0.01 * ((k + 1) as f64 * 0.9 * t as f64 + k as f64).sin()
}

fn risk_free(t: usize) -> f64 {
    0.0001 * (t % 3) as f64
}

fn date(t: usize) -> String {
    format!("{}-{:02}", 2019 + t / 12, t % 12 + 1)
}

/// Factor file plus a returns file with two regular stocks and one with
/// too few observations to fit.
fn write_data(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("ff5_session_{}_{}", name, std::process::id()));
    fs::create_dir_all(&dir).unwrap();
    let paths = DataPaths::from_dir(&dir);

    let mut factors = String::from(",Mkt-RF,SMB,HML,RMW,CMA,RF\n");
    let mut returns = String::from(",AAA,BBB,THIN\n");
    for t in 0..MONTHS {
        let f: Vec<f64> = (0..5).map(|k| factor_value(t, k)).collect();
        writeln!(
            factors,
            "{},{},{},{},{},{},{}",
            date(t),
            f[0],
            f[1],
            f[2],
            f[3],
            f[4],
            risk_free(t)
        )
        .unwrap();

        let noise = 0.0002 * (t as f64 * 2.9).cos();
        let aaa = 0.001 + 1.2 * f[0] + 0.5 * f[1] - 0.3 * f[2] + noise + risk_free(t);
        let bbb = -0.002 + 0.7 * f[0] - 0.2 * f[3] + 0.6 * f[4] - noise + risk_free(t);
        let thin = if t < 4 { format!("{}", 0.01 * t as f64) } else { String::new() };
        writeln!(returns, "{},{},{},{}", date(t), aaa, bbb, thin).unwrap();
    }

    fs::write(&paths.factors, factors).unwrap();
    fs::write(&paths.returns, returns).unwrap();
    dir
}

fn session(name: &str) -> (PredictionSession, PathBuf) {
    let dir = write_data(name);
    let data = DataSet::load(&DataPaths::from_dir(&dir)).unwrap();
    let session = PredictionSession::new(data, InputBounds::default()).unwrap();
    (session, dir)
}

#[test]
fn test_starts_on_first_stock_with_defaults() {
    let (session, dir) = session("defaults");

    assert_eq!(session.stocks(), ["AAA", "BBB", "THIN"]);
    assert_eq!(session.selected(), "AAA");
    assert_eq!(*session.inputs(), FactorInputs::default());
    assert_eq!(session.cached_fits(), 0);

    fs::remove_dir_all(dir).ok();
}

#[test]
fn test_predict_recovers_loadings() {
    let (mut session, dir) = session("predict");

    let (model, prediction) = session.predict().unwrap();
    let loadings = model.loadings();
    assert_eq!(model.symbol(), "AAA");
    assert_eq!(model.ols().nobs(), MONTHS);
    assert_abs_diff_eq!(loadings.beta(Factor::MarketExcess), 1.2, epsilon = 0.05);
    assert_abs_diff_eq!(loadings.beta(Factor::Hml), -0.3, epsilon = 0.05);
    assert_abs_diff_eq!(
        prediction,
        model.predict(&FactorInputs::default()),
        epsilon = 1e-15
    );

    fs::remove_dir_all(dir).ok();
}

#[test]
fn test_fits_are_cached_per_stock() {
    let (mut session, dir) = session("cache");

    session.model().unwrap();
    session.model().unwrap();
    assert_eq!(session.cached_fits(), 1);

    session.select_next();
    assert_eq!(session.selected(), "BBB");
    let alpha = session.model().unwrap().loadings().alpha;
    assert_abs_diff_eq!(alpha, -0.002, epsilon = 1e-3);
    assert_eq!(session.cached_fits(), 2);

    session.select_previous();
    assert_eq!(session.model().unwrap().symbol(), "AAA");
    assert_eq!(session.cached_fits(), 2);

    session.clear_cache();
    assert_eq!(session.cached_fits(), 0);

    fs::remove_dir_all(dir).ok();
}

#[test]
fn test_selection_wraps() {
    let (mut session, dir) = session("wrap");

    session.select_previous();
    assert_eq!(session.selected(), "THIN");
    session.select_next();
    assert_eq!(session.selected(), "AAA");

    session.select("BBB").unwrap();
    assert_eq!(session.selected_index(), 1);
    assert!(matches!(
        session.select("ZZZ"),
        Err(SessionError::Data(_))
    ));
    assert_eq!(session.selected(), "BBB");

    fs::remove_dir_all(dir).ok();
}

#[test]
fn test_inputs_change_prediction_without_refit() {
    let (mut session, dir) = session("inputs");

    let (_, before) = session.predict().unwrap();
    session.set_input(Factor::MarketExcess, 0.05).unwrap();
    let (model, after) = session.predict().unwrap();
    let beta = model.loadings().beta(Factor::MarketExcess);

    assert_abs_diff_eq!(after - before, beta * (0.05 - 0.007745), epsilon = 1e-12);
    assert_eq!(session.cached_fits(), 1);

    fs::remove_dir_all(dir).ok();
}

#[rstest]
#[case(Factor::Smb, 11.0)]
#[case(Factor::MarketExcess, -10.5)]
#[case(Factor::Cma, f64::NAN)]
fn test_out_of_range_input_is_rejected(#[case] factor: Factor, #[case] value: f64) {
    let (mut session, dir) = session(&format!("bounds_{}", factor.index()));

    let err = session.set_input(factor, value).unwrap_err();
    assert!(matches!(
        err,
        SessionError::Model(ModelError::OutOfBounds { .. })
    ));
    assert_eq!(
        session.inputs().get(factor),
        FactorInputs::default().get(factor)
    );

    fs::remove_dir_all(dir).ok();
}

#[test]
fn test_nudge_input() {
    let (mut session, dir) = session("nudge");

    assert_abs_diff_eq!(session.nudge_input(Factor::Smb, 2), 0.00147, epsilon = 1e-12);
    assert_abs_diff_eq!(session.inputs().smb, 0.00147, epsilon = 1e-12);

    fs::remove_dir_all(dir).ok();
}

#[test]
fn test_thin_stock_fails_to_fit() {
    let (mut session, dir) = session("thin");

    session.select("THIN").unwrap();
    assert!(matches!(
        session.model(),
        Err(SessionError::Model(ModelError::InsufficientData { .. }))
    ));
    assert_eq!(session.cached_fits(), 0);

    fs::remove_dir_all(dir).ok();
}

#[test]
fn test_cumulative_factor_returns() {
    let (mut session, dir) = session("growth");

    let growth = session.cumulative_factor_returns().unwrap();
    assert_eq!(growth.len(), 5);
    assert_eq!(growth[0].0, Factor::MarketExcess);
    assert_eq!(growth[4].1.len(), MONTHS);
    assert_abs_diff_eq!(growth[1].1[0], factor_value(0, 1), epsilon = 1e-12);

    let expected = (1.0 + factor_value(0, 2)) * (1.0 + factor_value(1, 2)) - 1.0;
    assert_abs_diff_eq!(growth[2].1[1], expected, epsilon = 1e-12);

    fs::remove_dir_all(dir).ok();
}

#[test]
fn test_with_inputs_validates() {
    let dir = write_data("with_inputs");
    let data = DataSet::load(&DataPaths::from_dir(&dir)).unwrap();
    let session = PredictionSession::new(data, InputBounds::default()).unwrap();

    let result = session.with_inputs(FactorInputs::from_values([20.0, 0.0, 0.0, 0.0, 0.0]));
    assert!(result.is_err());

    fs::remove_dir_all(dir).ok();
}
