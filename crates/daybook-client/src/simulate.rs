//! Synthetic sales for the day after the newest recorded day.

use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::dataset::{Dataset, Transaction};
use crate::error::{ClientError, ClientResult};

pub const CITIES: [&str; 3] = ["Rio de Janeiro", "São Paulo", "Manaus"];
pub const CUSTOMER_TYPES: [&str; 2] = ["Normal", "Membro"];
pub const GENDERS: [&str; 2] = ["Homem", "Mulher"];
pub const PRODUCT_LINES: [&str; 6] = [
    "Saude e Beleza",
    "Acessorios Eletronicos",
    "Casa e Estilo de Vida",
    "Esportes e Viagens",
    "Moda",
    "Alimentos e Bebidas",
];
pub const PAYMENT_METHODS: [&str; 3] = ["Pix", "Cartao de Credito", "Debito"];

pub const MIN_DEFAULT_ROWS: usize = 100;
pub const MAX_DEFAULT_ROWS: usize = 300;
pub const MAX_REQUESTED_ROWS: usize = 10_000;

const UNIT_PRICE_RANGE: (f64, f64) = (10.0, 130.0);
const QUANTITY_RANGE: (i64, i64) = (1, 15);
const OPENING_HOUR: u32 = 7;
const CLOSING_HOUR: u32 = 23;
const RATING_RANGE: (f64, f64) = (3.0, 10.0);

/// The day a simulation run writes: one past the newest day, or tomorrow when empty.
pub fn next_simulated_day(dataset: &Dataset, today: NaiveDate) -> ClientResult<NaiveDate> {
    let anchor = dataset.latest_day().unwrap_or(today);
    anchor.succ_opt().ok_or_else(|| {
        ClientError::invalid_argument(&format!(
            "Cannot simulate past {anchor}; no later calendar day exists."
        ))
    })
}

pub fn validate_row_count(count: usize) -> ClientResult<usize> {
    if count == 0 || count > MAX_REQUESTED_ROWS {
        return Err(ClientError::invalid_argument_for_command(
            &format!("`--count` must be between 1 and {MAX_REQUESTED_ROWS}; got {count}."),
            Some("simulate"),
        ));
    }
    Ok(count)
}

pub fn rng_from_seed(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

pub fn default_row_count<R: Rng>(rng: &mut R) -> usize {
    rng.gen_range(MIN_DEFAULT_ROWS..=MAX_DEFAULT_ROWS)
}

pub fn generate_transactions<R: Rng>(rng: &mut R, day: NaiveDate, count: usize) -> Vec<Transaction> {
    (0..count).map(|_| generate_transaction(rng, day)).collect()
}

fn generate_transaction<R: Rng>(rng: &mut R, day: NaiveDate) -> Transaction {
    let unit_price = round_cents(rng.gen_range(UNIT_PRICE_RANGE.0..=UNIT_PRICE_RANGE.1));
    let quantity = rng.gen_range(QUANTITY_RANGE.0..=QUANTITY_RANGE.1);
    let rating = (rng.gen_range(RATING_RANGE.0..=RATING_RANGE.1) * 10.0).round() / 10.0;

    Transaction {
        invoice_id: format!(
            "{}-{}-{}",
            rng.gen_range(100..=999),
            rng.gen_range(10..=99),
            rng.gen_range(1000..=9999)
        ),
        date: day,
        time: format!(
            "{:02}:{:02}",
            rng.gen_range(OPENING_HOUR..=CLOSING_HOUR),
            rng.gen_range(0..60)
        ),
        city: pick(rng, &CITIES).to_string(),
        customer_type: pick(rng, &CUSTOMER_TYPES).to_string(),
        gender: pick(rng, &GENDERS).to_string(),
        product_line: pick(rng, &PRODUCT_LINES).to_string(),
        payment_method: pick(rng, &PAYMENT_METHODS).to_string(),
        unit_price: Some(unit_price),
        quantity,
        total: round_cents(unit_price * quantity as f64),
        rating: Some(rating),
    }
}

fn pick<'a, R: Rng>(rng: &mut R, list: &[&'a str]) -> &'a str {
    list[rng.gen_range(0..list.len())]
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
