// Interactive menu dispatcher.
//
// One `Session` owns the gateway, the input source and the output sink for
// the lifetime of the menu loop. Dispatch is table-driven: codes 1..=16 map
// to handlers, 17 exits, anything else falls through to a single warning
// branch.

mod handlers;

use std::io::Write;

use chrono::NaiveDate;

use crate::core::{HotelError, SqlValue};
use crate::gateway::Gateway;
use crate::input::{self, LineSource};
use crate::render::{self, RenderMode};

pub const EXIT_CODE: i32 = 17;

struct MenuEntry<S> {
    code: i32,
    label: &'static str,
    run: fn(&mut S) -> Result<(), HotelError>,
}

pub struct Session<G, I, W> {
    gateway: G,
    input: I,
    out: W,
    mode: RenderMode,
}

impl<G, I, W> Session<G, I, W>
where
    G: Gateway,
    I: LineSource,
    W: Write,
{
    const MENU: [MenuEntry<Self>; 16] = [
        MenuEntry { code: 1, label: "Add new customer", run: Self::add_customer },
        MenuEntry { code: 2, label: "Add new room", run: Self::add_room },
        MenuEntry { code: 3, label: "Add new maintenance company", run: Self::add_maintenance_company },
        MenuEntry { code: 4, label: "Add new repair", run: Self::add_repair },
        MenuEntry { code: 5, label: "Add new booking", run: Self::book_room },
        MenuEntry { code: 6, label: "Assign house cleaning staff to a room", run: Self::assign_house_cleaning },
        MenuEntry { code: 7, label: "Raise a repair request", run: Self::repair_request },
        MenuEntry { code: 8, label: "Get number of available rooms", run: Self::number_of_available_rooms },
        MenuEntry { code: 9, label: "Get number of booked rooms", run: Self::number_of_booked_rooms },
        MenuEntry { code: 10, label: "Get hotel bookings for a week", run: Self::bookings_for_week },
        MenuEntry { code: 11, label: "Get top k rooms with highest price for a date range", run: Self::top_k_room_prices },
        MenuEntry { code: 12, label: "Get top k highest booking price for a customer", run: Self::top_k_bookings_for_customer },
        MenuEntry { code: 13, label: "Get customer total cost occurred for a given date range", run: Self::total_cost_for_customer },
        MenuEntry { code: 14, label: "List the repairs made by maintenance company", run: Self::list_repairs_made },
        MenuEntry { code: 15, label: "Get top k maintenance companies based on repair count", run: Self::top_k_maintenance_companies },
        MenuEntry { code: 16, label: "Get number of repairs occurred per year for a given hotel room", run: Self::repairs_per_year },
    ];

    pub fn new(gateway: G, input: I, out: W, mode: RenderMode) -> Self {
        debug_assert!(
            Self::MENU.iter().zip(1..).all(|(entry, code)| entry.code == code),
            "menu codes must be 1..=16 in declared order"
        );
        Self { gateway, input, out, mode }
    }

    /// Releases the collaborators so the caller can close the gateway
    /// connection exactly once, whatever way the loop ended.
    pub fn into_parts(self) -> (G, I, W) {
        (self.gateway, self.input, self.out)
    }

    /// Runs the menu loop until the exit selection or an input-transport
    /// failure. Statement failures are printed and the loop continues.
    pub fn run(&mut self) -> Result<(), HotelError> {
        loop {
            self.print_menu()?;
            let choice = self.int("Please make your choice")?;
            if choice == EXIT_CODE {
                return Ok(());
            }
            match Self::MENU.iter().find(|entry| entry.code == choice) {
                Some(entry) => {
                    if let Err(err) = (entry.run)(self) {
                        if err.is_fatal() {
                            return Err(err);
                        }
                        log::warn!("'{}' failed: {err}", entry.label);
                        writeln!(self.out, "{err}")?;
                    }
                }
                None => writeln!(self.out, "Unrecognized choice!")?,
            }
        }
    }

    fn print_menu(&mut self) -> Result<(), HotelError> {
        writeln!(self.out, "MAIN MENU")?;
        writeln!(self.out, "---------")?;
        for entry in &Self::MENU {
            writeln!(self.out, "{}. {}", entry.code, entry.label)?;
        }
        writeln!(self.out, "{EXIT_CODE}. < EXIT")?;
        Ok(())
    }

    // Prompt wrappers over the validating input loops.

    fn int(&mut self, label: &str) -> Result<i32, HotelError> {
        input::prompt_int(&mut self.input, &mut self.out, label)
    }

    fn bigint(&mut self, label: &str) -> Result<i64, HotelError> {
        input::prompt_bigint(&mut self.input, &mut self.out, label)
    }

    fn date(&mut self, label: &str) -> Result<NaiveDate, HotelError> {
        input::prompt_date(&mut self.input, &mut self.out, label)
    }

    fn flag(&mut self, label: &str) -> Result<bool, HotelError> {
        input::prompt_bool(&mut self.input, &mut self.out, label)
    }

    fn bounded(&mut self, label: &str, min: usize, max: usize) -> Result<String, HotelError> {
        input::prompt_bounded(&mut self.input, &mut self.out, label, min, max)
    }

    // Statement execution helpers.

    fn execute_write(&mut self, sql: &str, params: &[SqlValue]) -> Result<(), HotelError> {
        let affected = self.gateway.execute_update(sql, params)?;
        writeln!(self.out, "Done ({affected} row(s) affected)")?;
        Ok(())
    }

    /// Runs a SELECT, renders it, and prints the summary line with the
    /// rendered row count.
    fn run_report(
        &mut self,
        sql: &str,
        params: &[SqlValue],
        summary: &str,
    ) -> Result<(), HotelError> {
        let result = self.gateway.execute_query(sql, params)?;
        let count = render::write_result(&mut self.out, &result, self.mode)?;
        writeln!(self.out, "{summary}{count}")?;
        Ok(())
    }

    /// Runs a SELECT expected to produce a single integer cell; `None` for
    /// an empty result or a NULL cell (e.g. MAX over an empty table).
    fn query_scalar(&mut self, sql: &str, params: &[SqlValue]) -> Result<Option<i32>, HotelError> {
        let result = self.gateway.execute_query(sql, params)?;
        match result.rows.first().and_then(|row| row.first()) {
            None => Ok(None),
            Some(cell) if cell == "null" => Ok(None),
            Some(cell) => cell
                .parse::<i32>()
                .map(Some)
                .map_err(|_| HotelError::MissingField(format!("expected an integer, got '{cell}'"))),
        }
    }
}
