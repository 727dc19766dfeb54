use crate::store::SnapshotStore;

pub fn show(store: &SnapshotStore) -> Result<(), String> {
    let club = store.load()?;
    let s = &club.settings;
    println!("  Penalty cost:        {:.2}", s.penalty_cost_rate);
    println!("  Host bonus:          {:.2}", s.host_bonus_rate);
    println!("  Fixed contribution:  {:.2}", s.fixed_contribution);
    println!("  Data file:           {}", store.path().display());
    Ok(())
}

pub fn set(
    store: &SnapshotStore,
    penalty_cost: Option<f64>,
    host_bonus: Option<f64>,
    fixed_contribution: Option<f64>,
) -> Result<(), String> {
    if penalty_cost.is_none() && host_bonus.is_none() && fixed_contribution.is_none() {
        return Err(
            "nothing to change; pass --penalty-cost, --host-bonus or --fixed-contribution"
                .into(),
        );
    }

    let mut club = store.load()?;
    let mut settings = club.settings.clone();
    if let Some(v) = penalty_cost {
        settings = settings.with_penalty_cost_rate(v);
    }
    if let Some(v) = host_bonus {
        settings = settings.with_host_bonus_rate(v);
    }
    if let Some(v) = fixed_contribution {
        settings = settings.with_fixed_contribution(v);
    }
    settings.validate().map_err(|e| e.to_string())?;

    club.settings = settings;
    store.save(&mut club)?;
    println!("Settings saved");
    show(store)
}
