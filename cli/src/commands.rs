use loyalty_core::{ApiResult, Client, ClientForm, LoyaltyProgram, LoyaltyProgramForm, LoyaltyService};

use crate::args::{ClientAction, ProgramAction};

/// Load both lists concurrently. A failure in one list is reported and the
/// other is still shown.
pub async fn overview(svc: &LoyaltyService) -> anyhow::Result<()> {
    let (programs, clients) = tokio::join!(svc.list_loyalty_programs(), svc.list_clients());
    show("loyalty programs", programs, describe_program);
    show("clients", clients, describe_client);
    Ok(())
}

pub async fn programs(svc: &LoyaltyService, action: ProgramAction) -> anyhow::Result<()> {
    match action {
        ProgramAction::List => {
            for program in svc.list_loyalty_programs().await? {
                println!("{}", describe_program(&program));
            }
        }
        ProgramAction::Add(args) => {
            let program = LoyaltyProgramForm::from(args).into_program()?;
            let created = svc.create_loyalty_program(&program).await?;
            println!("created {}", describe_program(&created));
        }
        ProgramAction::Edit { id, changes } => {
            let current = svc.get_loyalty_program(id).await?;
            let mut form = LoyaltyProgramForm::from(&current);
            changes.apply(&mut form);
            let patch = form.diff(&current)?;
            if patch.is_empty() {
                println!("no changes detected");
                return Ok(());
            }
            let updated = svc.patch_loyalty_program(id, &patch).await?;
            println!("{}", outcome("loyalty program", id, updated, "updated"));
        }
        ProgramAction::Remove { id } => {
            let deleted = svc.delete_loyalty_program(id).await?;
            println!("{}", outcome("loyalty program", id, deleted, "deleted"));
        }
    }
    Ok(())
}

pub async fn clients(svc: &LoyaltyService, action: ClientAction) -> anyhow::Result<()> {
    match action {
        ClientAction::List => {
            for client in svc.list_clients().await? {
                println!("{}", describe_client(&client));
            }
        }
        ClientAction::Add(args) => {
            let programs = svc.list_loyalty_programs().await?;
            let client = ClientForm::from(args).into_client(&programs, chrono::Utc::now())?;
            let created = svc.create_client(&client).await?;
            println!("created {}", describe_client(&created));
        }
        ClientAction::Edit { id, changes } => {
            let (current, programs) = tokio::try_join!(svc.get_client(id), svc.list_loyalty_programs())?;
            let mut form = ClientForm::from(&current);
            changes.apply(&mut form);
            let patch = form.diff(&current, &programs)?;
            if patch.is_empty() {
                println!("no changes detected");
                return Ok(());
            }
            let updated = svc.patch_client(id, &patch).await?;
            println!("{}", outcome("client", id, updated, "updated"));
        }
        ClientAction::Remove { id } => {
            let deleted = svc.delete_client(id).await?;
            println!("{}", outcome("client", id, deleted, "deleted"));
        }
    }
    Ok(())
}

fn show<T>(title: &str, result: ApiResult<Vec<T>>, describe: fn(&T) -> String) {
    match result {
        Ok(items) => {
            println!("{} {title}", items.len());
            for item in &items {
                println!("  {}", describe(item));
            }
        }
        Err(err) => eprintln!("{title}: {err}"),
    }
}

fn outcome(noun: &str, id: i64, accepted: bool, verb: &str) -> String {
    if accepted {
        format!("{noun} {id} {verb}")
    } else {
        format!("{noun} {id} not {verb}")
    }
}

fn id_label(id: Option<i64>) -> String {
    id.map_or_else(|| "#?".to_string(), |id| format!("#{id}"))
}

fn describe_program(program: &LoyaltyProgram) -> String {
    format!(
        "{} level {}, {}% for {} days: {}",
        id_label(program.id),
        program.level,
        program.discount_amount,
        program.validity_period,
        program.description
    )
}

fn describe_client(client: &Client) -> String {
    format!(
        "{} {} {} {}, {}, {}, {}, program {}, registered {}",
        id_label(client.id),
        client.last_name,
        client.first_name,
        client.patronymic,
        client.phone_number,
        client.email,
        client.address,
        id_label(client.loyalty_program.id()),
        client.registration_date
    )
}
