//! Integration tests for the nodal-analysis engine and data matcher.

use wf_core::units::{kpa, m};
use wf_hydraulics::FlowCorrelation;
use wf_nodal::{
    AnalysisConstraints, Completion, DeviationSurvey, IprModel, MatchOptions, TestPoint,
    VlpSettings, bottomhole_pressure, match_vlp_to_test_points, match_vlp_with_options,
    perform_nodal_analysis,
};
use wf_pvt::FluidSpec;

fn completion() -> Completion {
    Completion {
        // 2-7/8" tubing
        tubing_inner_diameter: m(0.062),
        roughness: m(4.5e-5),
    }
}

fn survey_3000m() -> DeviationSurvey {
    DeviationSurvey::vertical(m(3_000.0), m(100.0)).unwrap()
}

fn producing_fluid() -> FluidSpec {
    FluidSpec::two_phase(35.0, 0.65, 100.0, 0.1)
}

/// 3,500 psi reservoir with a 0.8 bbl/d/psi composite-Vogel inflow.
fn vogel_ipr() -> IprModel {
    IprModel::Vogel {
        reservoir_pressure: kpa(24_132.0),
        productivity_index: 2.135e-10,
        bubble_point: kpa(8_274.0),
    }
}

#[test]
fn nodal_analysis_converges_on_operating_point() {
    let ipr = vogel_ipr();
    let vlp = VlpSettings::new(FlowCorrelation::BeggsBrill, kpa(690.0));
    let constraints = AnalysisConstraints::default();

    let result = perform_nodal_analysis(
        &ipr,
        &vlp,
        &producing_fluid(),
        &survey_3000m(),
        &completion(),
        &constraints,
    )
    .unwrap();

    assert!(result.converged, "warnings: {:?}", result.warnings);
    assert!(result.iterations <= constraints.max_iterations);

    let op = result.operating_point.expect("operating point");
    assert!(op.rate > 0.0);
    assert!(op.rate < ipr.max_rate());
    assert!(op.rate < result.vlp_curve.max_rate() + 1e-12);
    assert!(op.pwf > 0.0 && op.pwf < 24.132e6);

    // At the operating point the two curves agree within tolerance
    let pwf_ipr = ipr.pwf_at_rate(op.rate).unwrap();
    let pwf_vlp = bottomhole_pressure(
        &vlp,
        &producing_fluid(),
        &survey_3000m(),
        &completion(),
        op.rate,
    )
    .unwrap();
    assert!(
        (pwf_ipr - pwf_vlp).abs() < constraints.tolerance.value,
        "mismatch {} Pa",
        (pwf_ipr - pwf_vlp).abs()
    );
}

#[test]
fn depleted_reservoir_has_no_operating_point() {
    // A 5,000 kPa reservoir cannot lift a 3,000 m liquid column: the IPR
    // sits below the VLP requirement at every rate
    let ipr = IprModel::Vogel {
        reservoir_pressure: kpa(5_000.0),
        productivity_index: 2.0e-10,
        bubble_point: kpa(4_000.0),
    };
    let vlp = VlpSettings::new(FlowCorrelation::BeggsBrill, kpa(2_000.0));

    let result = perform_nodal_analysis(
        &ipr,
        &vlp,
        &producing_fluid(),
        &survey_3000m(),
        &completion(),
        &AnalysisConstraints::default(),
    )
    .unwrap();

    assert!(!result.converged);
    assert!(result.operating_point.is_none());
    assert!(
        result.warnings.iter().any(|w| w.contains("no operating point")),
        "{:?}",
        result.warnings
    );
}

#[test]
fn ipr_and_vlp_curves_are_returned_with_result() {
    let result = perform_nodal_analysis(
        &vogel_ipr(),
        &VlpSettings::new(FlowCorrelation::BeggsBrill, kpa(690.0)),
        &producing_fluid(),
        &survey_3000m(),
        &completion(),
        &AnalysisConstraints::default(),
    )
    .unwrap();

    assert!(!result.ipr_curve.is_empty());
    assert!(!result.vlp_curve.is_empty());
    // IPR decreasing, bounded by reservoir pressure
    assert!(result.ipr_curve.max_pressure() <= 24.132e6);
    let p = result.ipr_curve.pressures();
    assert!(p.first().unwrap() > p.last().unwrap());
}

#[test]
fn matcher_with_consistent_points_fits_immediately() {
    // Test points generated by the unbiased model itself: the fit should
    // hold at unity factors with near-zero error
    let vlp = VlpSettings::new(FlowCorrelation::BeggsBrill, kpa(690.0));
    let fluid = producing_fluid();
    let survey = survey_3000m();
    let comp = completion();

    let points: Vec<TestPoint> = [1.0e-3, 2.0e-3, 3.0e-3]
        .iter()
        .map(|&q| TestPoint {
            rate: q,
            pwf_pa: bottomhole_pressure(&vlp, &fluid, &survey, &comp, q).unwrap(),
            whp_pa: None,
            gor: None,
            water_cut: None,
            date: None,
        })
        .collect();

    let result = match_vlp_to_test_points(&vlp, &fluid, &survey, &comp, &points).unwrap();

    assert!(result.converged);
    assert!(result.rmse_pa < 1_000.0, "rmse = {} Pa", result.rmse_pa);
    assert!(result.mean_absolute_percent_error < 0.1);
    assert!((result.bias.friction - 1.0).abs() < 0.05);
    assert!((result.bias.holdup - 1.0).abs() < 0.05);
}

#[test]
fn matcher_recovers_friction_bias() {
    // Synthesize measurements with a known friction multiplier, then fit
    // only the friction factor
    let mut truth = VlpSettings::new(FlowCorrelation::BeggsBrill, kpa(690.0));
    truth.bias.friction = 1.4;
    let fluid = producing_fluid();
    let survey = survey_3000m();
    let comp = completion();

    let points: Vec<TestPoint> = [1.5e-3, 2.5e-3, 3.5e-3]
        .iter()
        .map(|&q| TestPoint {
            rate: q,
            pwf_pa: bottomhole_pressure(&truth, &fluid, &survey, &comp, q).unwrap(),
            whp_pa: None,
            gor: None,
            water_cut: None,
            date: None,
        })
        .collect();

    let unbiased = VlpSettings::new(FlowCorrelation::BeggsBrill, kpa(690.0));
    let options = MatchOptions {
        fit_friction: true,
        fit_holdup: false,
        fit_temperature: false,
        max_iterations: 25,
    };
    let result =
        match_vlp_with_options(&unbiased, &fluid, &survey, &comp, &points, &options).unwrap();

    assert!(
        (result.bias.friction - 1.4).abs() < 0.15,
        "fitted friction factor {}",
        result.bias.friction
    );
    assert!(result.r_squared > 0.9, "R² = {}", result.r_squared);
}

#[test]
fn matcher_rejects_empty_points() {
    let result = match_vlp_to_test_points(
        &VlpSettings::new(FlowCorrelation::BeggsBrill, kpa(690.0)),
        &producing_fluid(),
        &survey_3000m(),
        &completion(),
        &[],
    );
    assert!(result.is_err());
}

#[test]
fn matcher_warns_when_under_determined() {
    let vlp = VlpSettings::new(FlowCorrelation::BeggsBrill, kpa(690.0));
    let fluid = producing_fluid();
    let survey = survey_3000m();
    let comp = completion();

    let point = TestPoint {
        rate: 2.0e-3,
        pwf_pa: bottomhole_pressure(&vlp, &fluid, &survey, &comp, 2.0e-3).unwrap(),
        whp_pa: None,
        gor: None,
        water_cut: None,
        date: None,
    };

    // One point, two free factors
    let result = match_vlp_to_test_points(&vlp, &fluid, &survey, &comp, &[point]).unwrap();
    assert!(
        result
            .warnings
            .iter()
            .any(|w| w.contains("under-determined")),
        "{:?}",
        result.warnings
    );
}

#[test]
fn nodal_result_serializes() {
    let result = perform_nodal_analysis(
        &vogel_ipr(),
        &VlpSettings::new(FlowCorrelation::BeggsBrill, kpa(690.0)),
        &producing_fluid(),
        &survey_3000m(),
        &completion(),
        &AnalysisConstraints::default(),
    )
    .unwrap();

    let json = serde_json::to_string(&result).unwrap();
    let back: wf_nodal::NodalResult = serde_json::from_str(&json).unwrap();
    assert_eq!(back.converged, result.converged);
    assert_eq!(back.ipr_curve.len(), result.ipr_curve.len());
}
