use clap::{Args, Parser, Subcommand};
use loyalty_core::{ClientForm, LoyaltyProgramForm};

#[derive(Debug, Parser)]
#[command(name = "loyalty", about = "Manage clients and loyalty programs")]
pub struct Cli {
    /// Backend origin; overrides LOYALTY_BASE_URL.
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch clients and loyalty programs side by side.
    Overview,
    /// Loyalty program operations.
    Programs {
        #[command(subcommand)]
        action: ProgramAction,
    },
    /// Client operations.
    Clients {
        #[command(subcommand)]
        action: ClientAction,
    },
}

#[derive(Debug, Subcommand)]
pub enum ProgramAction {
    List,
    Add(NewProgram),
    Edit {
        id: i64,
        #[command(flatten)]
        changes: ProgramChanges,
    },
    Remove {
        id: i64,
    },
}

#[derive(Debug, Subcommand)]
pub enum ClientAction {
    List,
    Add(NewClient),
    Edit {
        id: i64,
        #[command(flatten)]
        changes: ClientChanges,
    },
    Remove {
        id: i64,
    },
}

#[derive(Debug, Args)]
pub struct NewProgram {
    #[arg(long)]
    pub level: i32,
    /// Discount in percent, 1 to 100.
    #[arg(long)]
    pub discount: i32,
    /// Validity in days.
    #[arg(long)]
    pub validity: i32,
    #[arg(long)]
    pub description: String,
}

impl From<NewProgram> for LoyaltyProgramForm {
    fn from(args: NewProgram) -> Self {
        Self {
            level: args.level,
            discount_amount: args.discount,
            validity_period: args.validity,
            description: args.description,
        }
    }
}

#[derive(Debug, Default, Args)]
pub struct ProgramChanges {
    #[arg(long)]
    pub level: Option<i32>,
    #[arg(long)]
    pub discount: Option<i32>,
    #[arg(long)]
    pub validity: Option<i32>,
    #[arg(long)]
    pub description: Option<String>,
}

impl ProgramChanges {
    pub fn apply(self, form: &mut LoyaltyProgramForm) {
        overwrite(&mut form.level, self.level);
        overwrite(&mut form.discount_amount, self.discount);
        overwrite(&mut form.validity_period, self.validity);
        overwrite(&mut form.description, self.description);
    }
}

#[derive(Debug, Args)]
pub struct NewClient {
    #[arg(long)]
    pub last_name: String,
    #[arg(long)]
    pub first_name: String,
    #[arg(long)]
    pub patronymic: String,
    #[arg(long = "phone")]
    pub phone_number: String,
    #[arg(long)]
    pub address: String,
    #[arg(long)]
    pub email: String,
    /// Id of an existing loyalty program.
    #[arg(long = "program")]
    pub program_id: i64,
}

impl From<NewClient> for ClientForm {
    fn from(args: NewClient) -> Self {
        Self {
            last_name: args.last_name,
            first_name: args.first_name,
            patronymic: args.patronymic,
            phone_number: args.phone_number,
            address: args.address,
            email: args.email,
            loyalty_program_id: args.program_id,
        }
    }
}

#[derive(Debug, Default, Args)]
pub struct ClientChanges {
    #[arg(long)]
    pub last_name: Option<String>,
    #[arg(long)]
    pub first_name: Option<String>,
    #[arg(long)]
    pub patronymic: Option<String>,
    #[arg(long = "phone")]
    pub phone_number: Option<String>,
    #[arg(long)]
    pub address: Option<String>,
    #[arg(long)]
    pub email: Option<String>,
    #[arg(long = "program")]
    pub program_id: Option<i64>,
}

impl ClientChanges {
    pub fn apply(self, form: &mut ClientForm) {
        overwrite(&mut form.last_name, self.last_name);
        overwrite(&mut form.first_name, self.first_name);
        overwrite(&mut form.patronymic, self.patronymic);
        overwrite(&mut form.phone_number, self.phone_number);
        overwrite(&mut form.address, self.address);
        overwrite(&mut form.email, self.email);
        overwrite(&mut form.loyalty_program_id, self.program_id);
    }
}

fn overwrite<T>(field: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *field = value;
    }
}
