// The sixteen menu operations.
//
// Each handler collects its fields in declared column order, binds every
// operator-supplied value as a placeholder and submits one statement
// (plus, for repair requests, two read-before-write lookups).

use std::io::Write;

use chrono::Days;

use super::Session;
use crate::core::{HotelError, SqlValue};
use crate::gateway::Gateway;
use crate::input::LineSource;

impl<G, I, W> Session<G, I, W>
where
    G: Gateway,
    I: LineSource,
    W: Write,
{
    pub(super) fn add_customer(&mut self) -> Result<(), HotelError> {
        let id = self.int("Customer ID")?;
        let first = self.bounded("First Name", 1, 30)?;
        let last = self.bounded("Last Name", 1, 30)?;
        let address = self.bounded("Address", 1, 100)?;
        let phone = self.bigint("Phone #")?;
        let dob = self.date("Date of Birth (YYYY-MM-DD)")?;
        let gender = self.bounded("Gender", 1, 10)?;
        self.execute_write(
            "INSERT INTO Customer VALUES ($1, $2, $3, $4, $5, $6, $7)",
            &[
                SqlValue::Int(id),
                SqlValue::Text(first),
                SqlValue::Text(last),
                SqlValue::Text(address),
                SqlValue::BigInt(phone),
                SqlValue::Date(dob),
                SqlValue::Text(gender),
            ],
        )
    }

    pub(super) fn add_room(&mut self) -> Result<(), HotelError> {
        let hotel = self.int("Hotel ID")?;
        let room = self.int("Room Number")?;
        let room_type = self.bounded("Room Type", 1, 10)?;
        self.execute_write(
            "INSERT INTO Room VALUES ($1, $2, $3)",
            &[
                SqlValue::Int(hotel),
                SqlValue::Int(room),
                SqlValue::Text(room_type),
            ],
        )
    }

    pub(super) fn add_maintenance_company(&mut self) -> Result<(), HotelError> {
        let id = self.int("Company ID")?;
        let name = self.bounded("Name", 1, 10)?;
        let address = self.bounded("Address", 1, 100)?;
        let certified = self.flag("Is the company certified? (TRUE/FALSE)")?;
        self.execute_write(
            "INSERT INTO MaintenanceCompany VALUES ($1, $2, $3, $4)",
            &[
                SqlValue::Int(id),
                SqlValue::Text(name),
                SqlValue::Text(address),
                SqlValue::Bool(certified),
            ],
        )
    }

    pub(super) fn add_repair(&mut self) -> Result<(), HotelError> {
        let id = self.int("Repair ID")?;
        let hotel = self.int("Hotel ID")?;
        let room = self.int("Room Number")?;
        let company = self.int("Company ID")?;
        let date = self.date("Repair Date (YYYY-MM-DD)")?;
        let description = self.bounded("Description of repair", 1, 100)?;
        let repair_type = self.bounded("Repair Type", 1, 10)?;
        self.execute_write(
            "INSERT INTO Repair VALUES ($1, $2, $3, $4, $5, $6, $7)",
            &[
                SqlValue::Int(id),
                SqlValue::Int(hotel),
                SqlValue::Int(room),
                SqlValue::Int(company),
                SqlValue::Date(date),
                SqlValue::Text(description),
                SqlValue::Text(repair_type),
            ],
        )
    }

    pub(super) fn book_room(&mut self) -> Result<(), HotelError> {
        let id = self.int("Booking ID")?;
        let customer = self.int("Customer ID")?;
        let hotel = self.int("Hotel ID")?;
        let room = self.int("Room Number")?;
        let date = self.date("Booking Date (YYYY-MM-DD)")?;
        let people = self.int("Number of People")?;
        let price = self.int("Price")?;
        self.execute_write(
            "INSERT INTO Booking VALUES ($1, $2, $3, $4, $5, $6, $7)",
            &[
                SqlValue::Int(id),
                SqlValue::Int(customer),
                SqlValue::Int(hotel),
                SqlValue::Int(room),
                SqlValue::Date(date),
                SqlValue::Int(people),
                SqlValue::Int(price),
            ],
        )
    }

    pub(super) fn assign_house_cleaning(&mut self) -> Result<(), HotelError> {
        let hotel = self.int("Hotel ID")?;
        let room = self.int("Room Number")?;
        let staff = self.int("Staff ID")?;
        self.execute_write(
            "UPDATE Assigned SET roomNo = $1 WHERE hotelID = $2 AND staffID = $3",
            &[
                SqlValue::Int(room),
                SqlValue::Int(hotel),
                SqlValue::Int(staff),
            ],
        )
    }

    pub(super) fn repair_request(&mut self) -> Result<(), HotelError> {
        let hotel = self.int("Hotel ID")?;
        // SSN and room number belong on the paper form but not in the
        // Request row.
        let _ssn = self.int("Staff SSN")?;
        let _room = self.int("Room Number")?;
        let repair = self.int("Repair ID")?;
        let date = self.date("Request Date (YYYY-MM-DD)")?;
        let description = self.bounded("Repair Request Description", 1, 100)?;

        let manager = self
            .query_scalar(
                "SELECT h.manager FROM Hotel h WHERE h.hID = $1",
                &[SqlValue::Int(hotel)],
            )?
            .ok_or_else(|| {
                HotelError::MissingField(format!("no manager found for hotel {hotel}"))
            })?;

        // max-then-insert is not transactionally guarded; concurrent
        // sessions on separate connections can collide on reqID.
        let next_id = self
            .query_scalar("SELECT MAX(r.reqID) FROM Request r", &[])?
            .unwrap_or(0)
            + 1;

        self.execute_write(
            "INSERT INTO Request VALUES ($1, $2, $3, $4, $5)",
            &[
                SqlValue::Int(next_id),
                SqlValue::Int(manager),
                SqlValue::Int(repair),
                SqlValue::Date(date),
                SqlValue::Text(description),
            ],
        )
    }

    pub(super) fn number_of_available_rooms(&mut self) -> Result<(), HotelError> {
        let hotel = self.int("Hotel ID")?;
        self.run_report(
            "SELECT COUNT(*) FROM Room r WHERE r.hotelID = $1 \
             AND r.roomNo NOT IN (SELECT b.roomNo FROM Booking b WHERE b.hotelID = $1)",
            &[SqlValue::Int(hotel)],
            "total row(s): ",
        )
    }

    pub(super) fn number_of_booked_rooms(&mut self) -> Result<(), HotelError> {
        let hotel = self.int("Hotel ID")?;
        self.run_report(
            "SELECT COUNT(*) FROM Booking b WHERE b.hotelID = $1",
            &[SqlValue::Int(hotel)],
            "Total row(s): ",
        )
    }

    pub(super) fn bookings_for_week(&mut self) -> Result<(), HotelError> {
        let hotel = self.int("Hotel ID")?;
        let start = self.date("Start Date (YYYY-MM-DD)")?;
        let end = start + Days::new(6);
        self.run_report(
            "SELECT b.bID, b.customer, b.roomNo, b.bookingDate, b.noOfPeople, b.price \
             FROM Booking b WHERE b.hotelID = $1 AND b.bookingDate BETWEEN $2 AND $3 \
             ORDER BY b.bookingDate ASC, b.bID ASC",
            &[
                SqlValue::Int(hotel),
                SqlValue::Date(start),
                SqlValue::Date(end),
            ],
            "Total row(s): ",
        )
    }

    pub(super) fn top_k_room_prices(&mut self) -> Result<(), HotelError> {
        let from = self.date("From Date (YYYY-MM-DD)")?;
        let to = self.date("To Date (YYYY-MM-DD)")?;
        let k = self.int("K")?;
        self.run_report(
            "SELECT b.hotelID, b.roomNo, b.price FROM Booking b \
             WHERE b.bookingDate BETWEEN $1 AND $2 \
             ORDER BY b.price DESC, b.bID ASC LIMIT $3",
            &[SqlValue::Date(from), SqlValue::Date(to), SqlValue::Int(k)],
            "Total row(s): ",
        )
    }

    pub(super) fn top_k_bookings_for_customer(&mut self) -> Result<(), HotelError> {
        let first = self.bounded("First Name", 1, 30)?;
        let last = self.bounded("Last Name", 1, 30)?;
        let k = self.int("K")?;
        self.run_report(
            "SELECT b.bookingDate, b.hotelID, b.roomNo, b.price \
             FROM Booking b, Customer c WHERE b.customer = c.customerID \
             AND c.fName = $1 AND c.lName = $2 \
             ORDER BY b.price DESC, b.bID ASC LIMIT $3",
            &[SqlValue::Text(first), SqlValue::Text(last), SqlValue::Int(k)],
            "Total row(s): ",
        )
    }

    pub(super) fn total_cost_for_customer(&mut self) -> Result<(), HotelError> {
        let hotel = self.int("Hotel ID")?;
        let first = self.bounded("First Name", 1, 30)?;
        let last = self.bounded("Last Name", 1, 30)?;
        let from = self.date("From Date (YYYY-MM-DD)")?;
        let to = self.date("To Date (YYYY-MM-DD)")?;
        self.run_report(
            "SELECT SUM(b.price) AS totalCost \
             FROM Booking b, Customer c WHERE b.customer = c.customerID \
             AND b.hotelID = $1 AND c.fName = $2 AND c.lName = $3 \
             AND b.bookingDate BETWEEN $4 AND $5",
            &[
                SqlValue::Int(hotel),
                SqlValue::Text(first),
                SqlValue::Text(last),
                SqlValue::Date(from),
                SqlValue::Date(to),
            ],
            "Total row(s): ",
        )
    }

    pub(super) fn list_repairs_made(&mut self) -> Result<(), HotelError> {
        let name = self.bounded("Maintenance Company Name", 1, 30)?;
        self.run_report(
            "SELECT r.repairType, r.hotelID, r.roomNo \
             FROM Repair r, MaintenanceCompany m \
             WHERE r.mCompany = m.cmpID AND m.name = $1",
            &[SqlValue::Text(name)],
            "Total row(s): ",
        )
    }

    pub(super) fn top_k_maintenance_companies(&mut self) -> Result<(), HotelError> {
        let k = self.int("K")?;
        self.run_report(
            "SELECT m.name, COUNT(r.rID) AS repairCount \
             FROM MaintenanceCompany m, Repair r WHERE r.mCompany = m.cmpID \
             GROUP BY m.cmpID, m.name \
             ORDER BY repairCount DESC, m.cmpID ASC LIMIT $1",
            &[SqlValue::Int(k)],
            "Total row(s): ",
        )
    }

    pub(super) fn repairs_per_year(&mut self) -> Result<(), HotelError> {
        let hotel = self.int("Hotel ID")?;
        let room = self.int("Room Number")?;
        self.run_report(
            "SELECT EXTRACT(YEAR FROM r.repairDate)::int AS year, COUNT(*) AS repairCount \
             FROM Repair r WHERE r.hotelID = $1 AND r.roomNo = $2 \
             GROUP BY year ORDER BY year ASC",
            &[SqlValue::Int(hotel), SqlValue::Int(room)],
            "Total row(s): ",
        )
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use chrono::NaiveDate;

    use crate::core::{HotelError, SqlValue};
    use crate::gateway::{Gateway, ResultSet};
    use crate::input::ScriptedInput;
    use crate::render::RenderMode;
    use crate::session::Session;

    #[derive(Default)]
    struct MockGateway {
        updates: Vec<(String, Vec<SqlValue>)>,
        queries: Vec<(String, Vec<SqlValue>)>,
        canned_queries: VecDeque<ResultSet>,
        update_errors: VecDeque<HotelError>,
    }

    impl Gateway for MockGateway {
        fn execute_update(&mut self, sql: &str, params: &[SqlValue]) -> Result<u64, HotelError> {
            self.updates.push((sql.to_string(), params.to_vec()));
            match self.update_errors.pop_front() {
                Some(err) => Err(err),
                None => Ok(1),
            }
        }

        fn execute_query(&mut self, sql: &str, params: &[SqlValue]) -> Result<ResultSet, HotelError> {
            self.queries.push((sql.to_string(), params.to_vec()));
            Ok(self.canned_queries.pop_front().unwrap_or_default())
        }
    }

    fn count_result(n: i64) -> ResultSet {
        ResultSet::new(vec!["count".into()], vec![vec![n.to_string()]])
    }

    fn run_session(
        lines: &[&str],
        gateway: MockGateway,
    ) -> (MockGateway, ScriptedInput, String) {
        let mut session = Session::new(
            gateway,
            ScriptedInput::new(lines.iter().copied()),
            Vec::new(),
            RenderMode::Plain,
        );
        session.run().expect("session should end cleanly");
        let (gateway, input, out) = session.into_parts();
        (gateway, input, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_exit_choice_terminates_loop() {
        let (gateway, _, out) = run_session(&["17"], MockGateway::default());
        assert!(out.contains("MAIN MENU"));
        assert!(out.contains("17. < EXIT"));
        assert!(gateway.updates.is_empty());
        assert!(gateway.queries.is_empty());
    }

    #[test]
    fn test_unrecognized_choice_warns_and_continues() {
        let (gateway, _, out) = run_session(&["99", "0", "17"], MockGateway::default());
        assert_eq!(out.matches("Unrecognized choice!").count(), 2);
        assert_eq!(out.matches("MAIN MENU").count(), 3);
        assert!(gateway.updates.is_empty());
    }

    #[test]
    fn test_add_customer_binds_seven_fields_in_declared_order() {
        let long_name = "x".repeat(31);
        let ok_name = "y".repeat(30);
        let lines = [
            "1",
            "7",
            long_name.as_str(), // rejected: 31 characters
            ok_name.as_str(),
            "Doe",
            "12 Elm Street",
            "5551234567",
            "1990-01-15",
            "Female",
            "17",
        ];
        let (gateway, input, out) = run_session(&lines, MockGateway::default());

        assert_eq!(gateway.updates.len(), 1);
        let (sql, params) = &gateway.updates[0];
        assert_eq!(sql, "INSERT INTO Customer VALUES ($1, $2, $3, $4, $5, $6, $7)");
        assert_eq!(
            params,
            &vec![
                SqlValue::Int(7),
                SqlValue::Text(ok_name),
                SqlValue::Text("Doe".into()),
                SqlValue::Text("12 Elm Street".into()),
                SqlValue::BigInt(5_551_234_567),
                SqlValue::Date(NaiveDate::from_ymd_opt(1990, 1, 15).unwrap()),
                SqlValue::Text("Female".into()),
            ]
        );
        assert!(out.contains("Invalid input: expected between 1 and 30 characters!"));

        // Fields were requested in declared column order.
        let field_prompts: Vec<&str> = input
            .prompts
            .iter()
            .map(String::as_str)
            .filter(|p| !p.starts_with("Please make your choice"))
            .collect();
        assert_eq!(
            field_prompts,
            vec![
                "Customer ID: ",
                "First Name: ",
                "First Name: ", // re-prompt after the 31-character reject
                "Last Name: ",
                "Address: ",
                "Phone #: ",
                "Date of Birth (YYYY-MM-DD): ",
                "Gender: ",
            ]
        );
    }

    #[test]
    fn test_failed_write_does_not_stop_dispatcher() {
        let mut gateway = MockGateway::default();
        gateway
            .update_errors
            .push_back(HotelError::Sql("duplicate key value".into()));
        gateway.canned_queries.push_back(count_result(3));

        // add_room fails, then booked-rooms still dispatches.
        let lines = ["2", "1", "101", "Suite", "9", "1", "17"];
        let (gateway, _, out) = run_session(&lines, gateway);

        assert!(out.contains("duplicate key value"));
        assert_eq!(gateway.updates.len(), 1);
        assert_eq!(gateway.queries.len(), 1);
        assert!(out.contains("Total row(s): 1"));
    }

    #[test]
    fn test_available_rooms_is_per_hotel_set_difference() {
        let mut gateway = MockGateway::default();
        gateway.canned_queries.push_back(count_result(3));
        let (gateway, _, out) = run_session(&["8", "5", "17"], gateway);

        let (sql, params) = &gateway.queries[0];
        assert!(sql.contains("r.hotelID = $1"));
        assert!(sql.contains("NOT IN (SELECT b.roomNo FROM Booking b WHERE b.hotelID = $1)"));
        assert_eq!(params, &vec![SqlValue::Int(5)]);
        assert!(out.contains("count\n3\n"));
        assert!(out.contains("total row(s): 1"));
    }

    #[test]
    fn test_booked_rooms_counts_raw_booking_rows() {
        let mut gateway = MockGateway::default();
        gateway.canned_queries.push_back(count_result(3));
        let (gateway, _, out) = run_session(&["9", "4", "17"], gateway);

        let (sql, params) = &gateway.queries[0];
        assert_eq!(sql, "SELECT COUNT(*) FROM Booking b WHERE b.hotelID = $1");
        assert_eq!(params, &vec![SqlValue::Int(4)]);
        assert!(out.contains("Total row(s): 1"));
    }

    #[test]
    fn test_list_repairs_projects_type_hotel_room() {
        let mut gateway = MockGateway::default();
        gateway.canned_queries.push_back(ResultSet::new(
            vec!["repairtype".into(), "hotelid".into(), "roomno".into()],
            vec![
                vec!["Plumbing".into(), "1".into(), "101".into()],
                vec!["Electric".into(), "2".into(), "202".into()],
            ],
        ));
        let (gateway, _, out) = run_session(&["14", "AAA Corp", "17"], gateway);

        let (sql, params) = &gateway.queries[0];
        assert!(sql.starts_with("SELECT r.repairType, r.hotelID, r.roomNo"));
        assert!(sql.contains("m.name = $1"));
        assert_eq!(params, &vec![SqlValue::Text("AAA Corp".into())]);
        assert!(out.contains("Plumbing\t1\t101"));
        assert!(out.contains("Total row(s): 2"));
    }

    #[test]
    fn test_repair_request_resolves_manager_and_next_id() {
        let mut gateway = MockGateway::default();
        gateway.canned_queries.push_back(ResultSet::new(
            vec!["manager".into()],
            vec![vec!["77".into()]],
        ));
        gateway
            .canned_queries
            .push_back(ResultSet::new(vec!["max".into()], vec![vec!["41".into()]]));

        let lines = [
            "7",
            "4",
            "123456789",
            "12",
            "9",
            "2024-05-01",
            "Broken sink",
            "17",
        ];
        let (gateway, _, _) = run_session(&lines, gateway);

        assert_eq!(gateway.queries.len(), 2);
        assert_eq!(gateway.queries[0].0, "SELECT h.manager FROM Hotel h WHERE h.hID = $1");
        assert_eq!(gateway.queries[0].1, vec![SqlValue::Int(4)]);
        assert_eq!(gateway.queries[1].0, "SELECT MAX(r.reqID) FROM Request r");

        assert_eq!(gateway.updates.len(), 1);
        let (sql, params) = &gateway.updates[0];
        assert_eq!(sql, "INSERT INTO Request VALUES ($1, $2, $3, $4, $5)");
        assert_eq!(
            params,
            &vec![
                SqlValue::Int(42),
                SqlValue::Int(77),
                SqlValue::Int(9),
                SqlValue::Date(NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()),
                SqlValue::Text("Broken sink".into()),
            ]
        );
    }

    #[test]
    fn test_repair_request_starts_ids_at_one_on_empty_table() {
        let mut gateway = MockGateway::default();
        gateway.canned_queries.push_back(ResultSet::new(
            vec!["manager".into()],
            vec![vec!["77".into()]],
        ));
        gateway
            .canned_queries
            .push_back(ResultSet::new(vec!["max".into()], vec![vec!["null".into()]]));

        let lines = ["7", "4", "1", "12", "9", "2024-05-01", "Leak", "17"];
        let (gateway, _, _) = run_session(&lines, gateway);
        assert_eq!(gateway.updates[0].1[0], SqlValue::Int(1));
    }

    #[test]
    fn test_repair_request_without_manager_reports_and_continues() {
        let mut gateway = MockGateway::default();
        // Empty result for the manager lookup.
        gateway.canned_queries.push_back(ResultSet::default());

        let lines = ["7", "4", "1", "12", "9", "2024-05-01", "Leak", "17"];
        let (gateway, _, out) = run_session(&lines, gateway);
        assert!(gateway.updates.is_empty());
        assert!(out.contains("no manager found for hotel 4"));
    }

    #[test]
    fn test_assignment_updates_room_keyed_by_hotel_and_staff() {
        let (gateway, _, _) = run_session(&["6", "3", "205", "88", "17"], MockGateway::default());
        let (sql, params) = &gateway.updates[0];
        assert_eq!(
            sql,
            "UPDATE Assigned SET roomNo = $1 WHERE hotelID = $2 AND staffID = $3"
        );
        assert_eq!(
            params,
            &vec![SqlValue::Int(205), SqlValue::Int(3), SqlValue::Int(88)]
        );
    }

    #[test]
    fn test_week_listing_spans_seven_days_inclusive() {
        let (gateway, _, _) = run_session(&["10", "2", "2024-03-01", "17"], MockGateway::default());
        let (sql, params) = &gateway.queries[0];
        assert!(sql.contains("BETWEEN $2 AND $3"));
        assert_eq!(
            params,
            &vec![
                SqlValue::Int(2),
                SqlValue::Date(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()),
                SqlValue::Date(NaiveDate::from_ymd_opt(2024, 3, 7).unwrap()),
            ]
        );
    }

    #[test]
    fn test_top_k_orders_descending_with_ascending_tie_break() {
        let (gateway, _, _) = run_session(
            &["11", "2024-01-01", "2024-12-31", "5", "15", "3", "17"],
            MockGateway::default(),
        );

        let (prices_sql, prices_params) = &gateway.queries[0];
        assert!(prices_sql.contains("ORDER BY b.price DESC, b.bID ASC LIMIT $3"));
        assert_eq!(prices_params[2], SqlValue::Int(5));

        let (companies_sql, companies_params) = &gateway.queries[1];
        assert!(companies_sql.contains("ORDER BY repairCount DESC, m.cmpID ASC LIMIT $1"));
        assert_eq!(companies_params, &vec![SqlValue::Int(3)]);
    }

    #[test]
    fn test_repairs_per_year_groups_by_year() {
        let (gateway, _, _) = run_session(&["16", "1", "101", "17"], MockGateway::default());
        let (sql, params) = &gateway.queries[0];
        assert!(sql.contains("EXTRACT(YEAR FROM r.repairDate)::int AS year"));
        assert!(sql.contains("GROUP BY year ORDER BY year ASC"));
        assert_eq!(params, &vec![SqlValue::Int(1), SqlValue::Int(101)]);
    }

    #[test]
    fn test_closed_input_mid_handler_is_fatal() {
        let mut session = Session::new(
            MockGateway::default(),
            ScriptedInput::new(["1", "7"]), // input ends mid add_customer
            Vec::new(),
            RenderMode::Plain,
        );
        let err = session.run().unwrap_err();
        assert!(matches!(err, HotelError::InputClosed));
        // The gateway is still recoverable for the one-and-only close.
        let (gateway, _, _) = session.into_parts();
        assert!(gateway.updates.is_empty());
    }
}
