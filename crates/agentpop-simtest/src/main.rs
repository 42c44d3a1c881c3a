//! agentpop Headless Harness
//!
//! Validates population logic end to end without any UI.
//! Optionally imports a CSV/JSON agent file and prints the report.
//!
//! Usage:
//!   cargo run -p agentpop-simtest
//!   cargo run -p agentpop-simtest -- --verbose
//!   cargo run -p agentpop-simtest -- --import agents.csv [--config population.json]

use std::path::Path;

use agentpop_logic::archetypes::{self, combination_count};
use agentpop_logic::config::{validate_config, PopulationConfig};
use agentpop_logic::dimensions::{self, validate_dimensions};
use agentpop_logic::model::Dimension;
use agentpop_logic::probability::{self, summarize};
use agentpop_logic::sampling::{allocate_counts, sample_archetypes};
use agentpop_logic::tabular;
use agentpop_logic::traits::{add_trait, update_trait};
use rand::rngs::StdRng;
use rand::SeedableRng;

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

struct Args {
    verbose: bool,
    import: Option<String>,
    config: Option<String>,
}

fn parse_args() -> Args {
    let mut args = Args {
        verbose: false,
        import: None,
        config: None,
    };
    let mut it = std::env::args().skip(1);
    while let Some(a) = it.next() {
        match a.as_str() {
            "--verbose" | "-v" => args.verbose = true,
            "--import" => args.import = it.next(),
            "--config" => args.config = it.next(),
            other => log::warn!("ignoring unknown argument {}", other),
        }
    }
    args
}

fn load_config(path: Option<&str>) -> PopulationConfig {
    let Some(path) = path else {
        return PopulationConfig::default();
    };
    match std::fs::read_to_string(path).map(|t| PopulationConfig::from_json(&t)) {
        Ok(Ok(cfg)) => cfg,
        Ok(Err(e)) => {
            log::error!("config {} is invalid ({}), using defaults", path, e);
            PopulationConfig::default()
        }
        Err(e) => {
            log::error!("cannot read config {} ({}), using defaults", path, e);
            PopulationConfig::default()
        }
    }
}

fn main() {
    env_logger::init();
    let args = parse_args();
    let config = load_config(args.config.as_deref());
    println!("=== agentpop Population Harness ===\n");

    let mut results = Vec::new();

    // 1. Configuration
    results.extend(validate_configuration(&config, args.verbose));

    // 2. Archetype generation
    results.extend(validate_generation(args.verbose));

    // 3. Probability redistribution
    results.extend(validate_redistribution(&config, args.verbose));

    // 4. Allocation & sampling
    results.extend(validate_sampling(args.verbose));

    // 5. Tabular import
    results.extend(validate_import(&config, args.verbose));

    // 6. User-supplied file
    if let Some(path) = &args.import {
        results.extend(import_file(path, &config));
    }

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || args.verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed, total, failed
    );

    if failed > 0 {
        std::process::exit(1);
    }
}

fn census() -> Vec<Dimension> {
    vec![
        Dimension::new("Age", &["18-29", "30-44", "45-64", "65+"]),
        Dimension::new("Gender", &["Female", "Male", "Nonbinary"]),
        Dimension::new("Region", &["Urban", "Suburban", "Rural"]),
    ]
}

// ── 1. Configuration ────────────────────────────────────────────────────

fn validate_configuration(config: &PopulationConfig, verbose: bool) -> Vec<TestResult> {
    println!("--- Configuration ---");
    let errors = validate_config(config);
    if verbose {
        println!(
            "  role={} model={} tolerance={} cap={}",
            config.default_role,
            config.llm_config.model,
            config.normalization_tolerance,
            config.max_displayed_errors
        );
    }
    vec![TestResult {
        name: "config_valid".into(),
        passed: errors.is_empty(),
        detail: if errors.is_empty() {
            "configuration is valid".into()
        } else {
            format!("{:?}", errors)
        },
    }]
}

// ── 2. Archetype Generation ─────────────────────────────────────────────

fn validate_generation(verbose: bool) -> Vec<TestResult> {
    println!("--- Archetype Generation ---");
    let mut results = Vec::new();
    let dims = census();

    results.push(TestResult {
        name: "dimensions_valid".into(),
        passed: validate_dimensions(&dims).is_empty(),
        detail: format!("{} dimensions", dims.len()),
    });

    let arch = archetypes::generate(&dims);
    let expected = combination_count(&dims).unwrap_or(0);
    results.push(TestResult {
        name: "cross_product_size".into(),
        passed: arch.len() == expected && expected == 36,
        detail: format!("{} archetypes (expected {})", arch.len(), expected),
    });

    let uniform = 1.0 / arch.len().max(1) as f64;
    let bad: Vec<_> = arch
        .iter()
        .filter(|a| (a.probability - uniform).abs() > 1e-12)
        .collect();
    results.push(TestResult {
        name: "uniform_probability".into(),
        passed: bad.is_empty(),
        detail: format!("each archetype at {:.4}", uniform),
    });

    let total = probability::total_probability(&arch);
    results.push(TestResult {
        name: "uniform_sums_to_one".into(),
        passed: (total - 1.0).abs() < 1e-9,
        detail: format!("total = {:.12}", total),
    });

    let ids_ok = arch
        .iter()
        .enumerate()
        .all(|(i, a)| a.id == format!("arch_{}", i));
    results.push(TestResult {
        name: "sequential_ids".into(),
        passed: ids_ok,
        detail: "arch_0..arch_n in enumeration order".into(),
    });

    let emptied = dimensions::add_dimension(&dims, Dimension::new("Income", &[]));
    results.push(TestResult {
        name: "zero_category_dimension".into(),
        passed: archetypes::generate(&emptied).is_empty(),
        detail: "a dimension without categories yields no archetypes".into(),
    });

    results.push(TestResult {
        name: "empty_input".into(),
        passed: archetypes::generate(&[]).is_empty(),
        detail: "no dimensions → no archetypes".into(),
    });

    if verbose {
        for a in arch.iter().take(3) {
            println!("  {} {} p={:.4}", a.id, a.label, a.probability);
        }
    }

    results
}

// ── 3. Probability Redistribution ───────────────────────────────────────

fn validate_redistribution(config: &PopulationConfig, verbose: bool) -> Vec<TestResult> {
    println!("--- Probability Redistribution ---");
    let mut results = Vec::new();
    let tol = config.normalization_tolerance;
    let base = archetypes::generate(&census());

    // Sweep target values across several archetypes
    let mut worst: f64 = 0.0;
    for id in ["arch_0", "arch_7", "arch_35"] {
        for step in 0..=20 {
            let v = step as f64 / 20.0;
            let out = probability::set_probability(&base, id, v);
            worst = worst.max((probability::total_probability(&out) - 1.0).abs());
        }
    }
    results.push(TestResult {
        name: "redistribution_sum_sweep".into(),
        passed: worst < 1e-9,
        detail: format!("max |sum - 1| = {:.2e}", worst),
    });

    // Skew first so the untouched archetypes differ; an equal split of the
    // second edit's delta would then change their ratio.
    let skewed = probability::set_probability(&base, "arch_0", 0.5);
    let before = skewed[0].probability / skewed[2].probability;
    let edited = probability::set_probability(&skewed, "arch_1", 0.2);
    let after = edited[0].probability / edited[2].probability;
    results.push(TestResult {
        name: "redistribution_proportional".into(),
        passed: (before - 1.0).abs() > 1e-3 && (after - before).abs() < 1e-9,
        detail: format!("untouched ratio {:.6} -> {:.6}", before, after),
    });

    let degenerate = probability::set_probability(
        &probability::set_probability(&base, "arch_0", 1.0),
        "arch_0",
        0.3,
    );
    let summary = summarize(&degenerate, tol);
    results.push(TestResult {
        name: "degenerate_flagged".into(),
        passed: !summary.normalized && (summary.total - 0.3).abs() < 1e-12,
        detail: format!("total {:.3}, normalized={}", summary.total, summary.normalized),
    });

    let once = probability::normalize(&degenerate);
    let twice = probability::normalize(&once);
    let idempotent = once
        .iter()
        .zip(&twice)
        .all(|(a, b)| (a.probability - b.probability).abs() < 1e-12);
    results.push(TestResult {
        name: "normalize_idempotent".into(),
        passed: idempotent && summarize(&once, tol).normalized,
        detail: "normalize(normalize(x)) == normalize(x)".into(),
    });

    let grown = dimensions::add_category(&census(), 2, "Remote");
    let carried = archetypes::regenerate(&skewed, &grown);
    results.push(TestResult {
        name: "regenerate_carries_forward".into(),
        passed: summarize(&carried, tol).normalized
            && carried[0].probability > carried[1].probability,
        detail: format!(
            "{} archetypes, first keeps {:.4}",
            carried.len(),
            carried[0].probability
        ),
    });

    let traits = add_trait(&add_trait(&[], "Openness", 120.0, 10.0), "Neuroticism", 40.0, 90.0);
    let traits = update_trait(&traits, "trait_1", "Openness", -5.0, 10.0);
    results.push(TestResult {
        name: "trait_bounds_clamped".into(),
        passed: traits[0].mean == 0.0 && traits[1].std == 50.0,
        detail: "mean in [0,100], std in [0,50]".into(),
    });

    if verbose {
        println!(
            "  skewed: arch_0={:.3} arch_1={:.4}",
            skewed[0].probability, skewed[1].probability
        );
    }

    results
}

// ── 4. Allocation & Sampling ────────────────────────────────────────────

fn validate_sampling(verbose: bool) -> Vec<TestResult> {
    println!("--- Allocation & Sampling ---");
    let mut results = Vec::new();
    let arch = probability::set_probability(&archetypes::generate(&census()), "arch_0", 0.25);

    let counts = allocate_counts(&arch, 500);
    let total: u32 = counts.iter().sum();
    results.push(TestResult {
        name: "allocation_exact_total".into(),
        passed: total == 500,
        detail: format!("{} agents allocated", total),
    });
    results.push(TestResult {
        name: "allocation_respects_weight".into(),
        passed: counts[0] == 125,
        detail: format!("arch_0 gets {} of 500", counts[0]),
    });

    let mut rng = StdRng::seed_from_u64(42);
    let draws = sample_archetypes(&arch, 10_000, &mut rng);
    let hits = draws.iter().filter(|&&i| i == 0).count();
    let share = hits as f64 / draws.len().max(1) as f64;
    results.push(TestResult {
        name: "sampling_matches_weight".into(),
        passed: draws.len() == 10_000 && (share - 0.25).abs() < 0.03,
        detail: format!("arch_0 drawn {:.3} of the time", share),
    });

    if verbose {
        println!("  counts: {:?}", &counts[..6]);
    }

    results
}

// ── 5. Tabular Import ───────────────────────────────────────────────────

fn validate_import(config: &PopulationConfig, verbose: bool) -> Vec<TestResult> {
    println!("--- Tabular Import ---");
    let mut results = Vec::new();

    let report = tabular::parse(
        "header.csv",
        "agent_name,agent_description\nAda,A mathematician\nGrace,A programmer",
        config,
    );
    results.push(TestResult {
        name: "csv_header".into(),
        passed: report.is_clean()
            && report.accepted.len() == 2
            && report.accepted[0].name == "Ada"
            && report.accepted[1].name == "Grace",
        detail: format!("{} accepted", report.accepted.len()),
    });

    let report = tabular::parse(
        "positional.csv",
        "Ada,A mathematician,founder\nGrace,A programmer,engineer",
        config,
    );
    let attrs: Vec<_> = report
        .accepted
        .iter()
        .filter_map(|r| r.properties.get("attribute1").and_then(|v| v.as_str()))
        .collect();
    results.push(TestResult {
        name: "csv_positional".into(),
        passed: report.is_clean() && attrs == ["founder", "engineer"],
        detail: format!("attribute1 = {:?}", attrs),
    });

    let report = tabular::parse(
        "partial.json",
        r#"[{"name":"A","profile":"a"},{"profile":"b"},{"name":"C","profile":"c"}]"#,
        config,
    );
    results.push(TestResult {
        name: "json_partial_failure".into(),
        passed: report.accepted.len() == 2
            && report.errors.len() == 1
            && report.errors[0].row_label == "Row 2",
        detail: report.summary(config.max_displayed_errors),
    });

    let report = tabular::parse(
        "reserved.json",
        r#"[{"name":"X","profile":"Y","role":"R","extra":"Z"}]"#,
        config,
    );
    let ok = report
        .accepted
        .first()
        .map(|r| r.role == "R" && r.properties.contains_key("extra") && !r.properties.contains_key("role"))
        .unwrap_or(false);
    results.push(TestResult {
        name: "reserved_key_exclusion".into(),
        passed: ok,
        detail: "role is first-class, extra is a property".into(),
    });

    let report = tabular::parse("agents.xml", "<agents/>", config);
    results.push(TestResult {
        name: "unsupported_format".into(),
        passed: report.accepted.is_empty() && report.errors.len() == 1,
        detail: report.summary(config.max_displayed_errors),
    });

    if verbose {
        println!("  default role: {}", config.default_role);
    }

    results
}

// ── 6. User File ────────────────────────────────────────────────────────

fn import_file(path: &str, config: &PopulationConfig) -> Vec<TestResult> {
    println!("--- Import {} ---", path);
    let filename = Path::new(path)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(path);

    let text = match std::fs::read_to_string(path) {
        Ok(t) => t,
        Err(e) => {
            return vec![TestResult {
                name: "import_read".into(),
                passed: false,
                detail: format!("cannot read {}: {}", path, e),
            }];
        }
    };

    let report = tabular::parse(filename, &text, config);
    println!(
        "  {} accepted, {} rejected",
        report.accepted.len(),
        report.errors.len()
    );
    for r in &report.accepted {
        println!("  + {} ({}): {}", r.name, r.role, r.profile);
    }
    let summary = report.summary(config.max_displayed_errors);
    if !summary.is_empty() {
        println!("{}", summary);
    }

    vec![TestResult {
        name: "import_file".into(),
        passed: !report.accepted.is_empty(),
        detail: format!("{} agents from {}", report.accepted.len(), filename),
    }]
}
