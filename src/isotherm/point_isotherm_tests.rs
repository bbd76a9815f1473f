#[cfg(test)]
mod tests {
    use crate::isotherm::descriptor::{Branch, BranchFilter, BranchSpec, IsothermUnits};
    use crate::isotherm::interpolator::{FillPolicy, InterpolationKind};
    use crate::isotherm::point_isotherm::{
        InterpQuery, IsothermData, LoadingQuery, PointIsotherm, PressureQuery,
    };
    use crate::species::material::Material;
    use crate::species::registry::find_adsorbate;
    use crate::units::loading::{AmountUnit, LoadingBasis};
    use crate::units::pressure::{PressureMode, PressureUnit};
    use crate::units::temperature::TemperatureUnit;
    use approx::assert_relative_eq;

    fn n2_iso() -> PointIsotherm {
        let data = IsothermData::new(
            vec![0.1, 0.3, 0.5, 0.7, 0.9, 0.6, 0.4],
            vec![1.0, 2.0, 3.0, 4.0, 5.0, 4.5, 2.5],
        );
        PointIsotherm::new(
            Material::new("takeda"),
            find_adsorbate("nitrogen").unwrap(),
            77.355,
            data,
            IsothermUnits::default(),
        )
        .unwrap()
    }

    #[test]
    fn branch_split_at_first_pressure_drop() {
        let iso = n2_iso();
        let labels = iso.branch_labels();
        assert_eq!(&labels[..5], &[Branch::Adsorption; 5]);
        assert_eq!(&labels[5..], &[Branch::Desorption; 2]);
        assert!(iso.has_branch(Branch::Desorption));
    }

    #[test]
    fn tie_inherits_previous_branch_label() {
        let data = IsothermData::new(vec![0.1, 0.5, 0.5, 0.3], vec![1.0, 3.0, 3.1, 2.0]);
        let iso = PointIsotherm::new(
            Material::new("takeda"),
            find_adsorbate("nitrogen").unwrap(),
            77.355,
            data,
            IsothermUnits::default(),
        )
        .unwrap();
        assert_eq!(
            iso.branch_labels(),
            &[
                Branch::Adsorption,
                Branch::Adsorption,
                Branch::Adsorption,
                Branch::Desorption
            ]
        );
    }

    #[test]
    fn explicit_branch_labels_must_match_length() {
        let data = IsothermData::new(vec![0.1, 0.2], vec![1.0, 2.0])
            .with_branch(BranchSpec::Explicit(vec![Branch::Adsorption]));
        let res = PointIsotherm::new(
            Material::new("takeda"),
            find_adsorbate("nitrogen").unwrap(),
            77.355,
            data,
            IsothermUnits::default(),
        );
        assert!(res.is_err());
    }

    #[test]
    fn constructor_rejects_bad_input() {
        let ads = find_adsorbate("nitrogen").unwrap();
        // empty table
        assert!(
            PointIsotherm::new(
                Material::new("m"),
                ads.clone(),
                77.0,
                IsothermData::new(vec![], vec![]),
                IsothermUnits::default(),
            )
            .is_err()
        );
        // length mismatch
        assert!(
            PointIsotherm::new(
                Material::new("m"),
                ads.clone(),
                77.0,
                IsothermData::new(vec![0.1, 0.2], vec![1.0]),
                IsothermUnits::default(),
            )
            .is_err()
        );
        // NaN loading
        assert!(
            PointIsotherm::new(
                Material::new("m"),
                ads.clone(),
                77.0,
                IsothermData::new(vec![0.1, 0.2], vec![1.0, f64::NAN]),
                IsothermUnits::default(),
            )
            .is_err()
        );
        // missing temperature
        assert!(
            PointIsotherm::new(
                Material::new("m"),
                ads,
                f64::NAN,
                IsothermData::new(vec![0.1], vec![1.0]),
                IsothermUnits::default(),
            )
            .is_err()
        );
    }

    #[test]
    fn pressure_query_converts_units_without_mutation() {
        let iso = n2_iso();
        let bar = iso.pressure(&PressureQuery::default()).unwrap();
        let pa = iso
            .pressure(&PressureQuery {
                unit: Some(PressureUnit::Pascal),
                ..Default::default()
            })
            .unwrap();
        for (b, p) in bar.iter().zip(&pa) {
            assert_relative_eq!(p / b, 1e5, max_relative = 1e-12);
        }
        // storage untouched
        assert_relative_eq!(iso.pressure(&PressureQuery::default()).unwrap()[0], 0.1);
    }

    #[test]
    fn pressure_query_relative_mode() {
        let iso = n2_iso();
        let p_sat = iso.adsorbate.saturation_pressure(77.355).unwrap();
        let rel = iso
            .pressure(&PressureQuery::relative(BranchFilter::Ads))
            .unwrap();
        assert_relative_eq!(rel[0], 0.1 * 1e5 / p_sat, max_relative = 1e-10);
    }

    #[test]
    fn pressure_limits_filter_after_conversion() {
        let iso = n2_iso();
        let out = iso
            .pressure(&PressureQuery {
                branch: BranchFilter::Ads,
                limits: Some((0.25, 0.75)),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(out, vec![0.3, 0.5, 0.7]);
    }

    #[test]
    fn loading_query_converts_basis_and_unit() {
        let iso = n2_iso();
        let mol = iso
            .loading(&LoadingQuery {
                branch: BranchFilter::Ads,
                basis: Some(LoadingBasis::Molar),
                unit: Some(AmountUnit::Mole),
                ..Default::default()
            })
            .unwrap();
        assert_relative_eq!(mol[0], 1.0e-3, max_relative = 1e-12);

        let mg = iso
            .loading(&LoadingQuery {
                branch: BranchFilter::Ads,
                basis: Some(LoadingBasis::Mass),
                unit: Some(AmountUnit::Milligram),
                ..Default::default()
            })
            .unwrap();
        // 1 mmol N2 = 28.0134 mg
        assert_relative_eq!(mg[0], 28.0134, max_relative = 1e-10);
    }

    #[test]
    fn loading_query_rescales_material_denominator() {
        let iso = n2_iso();
        let per_kg = iso
            .loading(&LoadingQuery {
                branch: BranchFilter::Ads,
                material_unit: Some(AmountUnit::Kilogram),
                ..Default::default()
            })
            .unwrap();
        assert_relative_eq!(per_kg[0], 1000.0, max_relative = 1e-12);
    }

    #[test]
    fn interpolation_and_reverse_interpolation() {
        let iso = n2_iso();
        let q = InterpQuery::default();
        assert_relative_eq!(iso.loading_at(0.2, &q).unwrap(), 1.5, max_relative = 1e-12);
        assert_relative_eq!(iso.pressure_at(1.5, &q).unwrap(), 0.2, max_relative = 1e-12);
        assert!(iso.loading_at(2.0, &q).is_err());
        let q = InterpQuery {
            fill: FillPolicy::Extrapolate,
            ..Default::default()
        };
        assert_relative_eq!(iso.loading_at(1.1, &q).unwrap(), 6.0, max_relative = 1e-12);
    }

    #[test]
    fn desorption_branch_interpolates_separately() {
        let iso = n2_iso();
        let q = InterpQuery {
            branch: Branch::Desorption,
            kind: InterpolationKind::Linear,
            fill: FillPolicy::Error,
        };
        assert_relative_eq!(iso.loading_at(0.5, &q).unwrap(), 3.5, max_relative = 1e-12);
    }

    #[test]
    fn spreading_pressure_henry_head_and_segments() {
        let data = IsothermData::new(vec![1.0, 2.0], vec![2.0, 3.0]);
        let iso = PointIsotherm::new(
            Material::new("m"),
            find_adsorbate("nitrogen").unwrap(),
            303.0,
            data,
            IsothermUnits::default(),
        )
        .unwrap();
        let q = InterpQuery::default();
        // below the first point: Henry law
        assert_relative_eq!(
            iso.spreading_pressure_at(0.5, &q).unwrap(),
            1.0,
            max_relative = 1e-12
        );
        // at the first point: exactly n0
        assert_relative_eq!(
            iso.spreading_pressure_at(1.0, &q).unwrap(),
            2.0,
            max_relative = 1e-12
        );
        // at the second: n0 + slope*dp + intercept*ln(p2/p1)
        let expected = 2.0 + 1.0 * 1.0 + 1.0 * (2.0f64).ln();
        assert_relative_eq!(
            iso.spreading_pressure_at(2.0, &q).unwrap(),
            expected,
            max_relative = 1e-12
        );
        // beyond the last point, extrapolation off
        assert!(iso.spreading_pressure_at(3.0, &q).is_err());
        let q = InterpQuery {
            fill: FillPolicy::Extrapolate,
            ..Default::default()
        };
        assert!(iso.spreading_pressure_at(3.0, &q).unwrap() > expected);
    }

    #[test]
    fn in_place_conversions_update_storage_and_descriptor() {
        let mut iso = n2_iso();
        iso.convert_pressure(PressureMode::Absolute, Some(PressureUnit::Pascal))
            .unwrap();
        assert_eq!(iso.units().pressure_unit, Some(PressureUnit::Pascal));
        assert_relative_eq!(
            iso.pressure(&PressureQuery::default()).unwrap()[0],
            1e4,
            max_relative = 1e-12
        );

        iso.convert_loading(LoadingBasis::Mass, Some(AmountUnit::Gram))
            .unwrap();
        assert_eq!(iso.units().loading_basis, LoadingBasis::Mass);
        assert_relative_eq!(
            iso.loading(&LoadingQuery::default()).unwrap()[0],
            28.0134e-3,
            max_relative = 1e-10
        );

        iso.convert_temperature(TemperatureUnit::Celsius);
        assert_relative_eq!(iso.temperature(), 77.355 - 273.15, max_relative = 1e-12);
        assert_relative_eq!(iso.temperature_k(), 77.355, max_relative = 1e-12);
    }

    #[test]
    fn fingerprint_identity_and_equality() {
        let a = n2_iso();
        let b = n2_iso();
        assert_eq!(a.fingerprint(), b.fingerprint());
        assert_eq!(a, b);

        let mut c = n2_iso();
        c.convert_pressure(PressureMode::Absolute, Some(PressureUnit::Pascal))
            .unwrap();
        assert_ne!(a.fingerprint(), c.fingerprint());
    }

    #[test]
    fn other_data_follows_branch_filter() {
        let data = IsothermData::new(vec![0.1, 0.5, 0.3], vec![1.0, 3.0, 2.0])
            .with_column("enthalpy", vec![10.0, 11.0, 12.0]);
        let iso = PointIsotherm::new(
            Material::new("m"),
            find_adsorbate("nitrogen").unwrap(),
            77.355,
            data,
            IsothermUnits::default(),
        )
        .unwrap();
        assert_eq!(
            iso.other_data("enthalpy", BranchFilter::Des).unwrap(),
            vec![12.0]
        );
        assert!(iso.other_data("missing", BranchFilter::All).is_err());
    }
}
