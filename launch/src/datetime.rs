// Copyright  (C) 2020, Kisio Digital and/or its affiliates. All rights reserved.
//
// This file is part of Navitia,
// the software to build cool stuff with public transport.
//
// Hope you'll enjoy and contribute to this project,
// powered by Kisio Digital (www.kisio.com).
// Help us simplify mobility and open public transport:
// a non ending quest to the responsive locomotion way of traveling!
//
// This contribution is a part of the research and development work of the
// IVA Project which aims to enhance traveler information and is carried out
// under the leadership of the Technological Research Institute SystemX,
// with the partnership and support of the transport organization authority
// Ile-De-France Mobilités (IDFM), SNCF, and public funds
// under the scope of the French Program "Investissements d’Avenir".
//
// LICENCE: This program is free software; you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <http://www.gnu.org/licenses/>.
//
// Stay tuned using
// twitter @navitia
// channel `#navitia` on riot https://riot.im/app/#/room/#navitia:matrix.org
// https://groups.google.com/d/forum/navitia
// www.navitia.io

use chrono::{NaiveDate, NaiveDateTime, Timelike};
use rangeraptor::SecondsSinceDayStart;

const SECONDS_IN_A_DAY: i64 = 24 * 60 * 60;

pub fn parse_datetime(string_datetime: &str) -> Result<NaiveDateTime, BadDateTime> {
    let try_datetime = NaiveDateTime::parse_from_str(string_datetime, "%Y%m%dT%H%M%S");
    match try_datetime {
        Ok(datetime) => Ok(datetime),
        Err(_) => {
            let err = BadDateTime {
                string_datetime: string_datetime.to_string(),
            };
            Err(err)
        }
    }
}

/// Seconds elapsed between the start of `service_day` and `datetime`.
///
/// Negative when `datetime` is before `service_day`.
pub fn seconds_since_day_start(
    datetime: &NaiveDateTime,
    service_day: NaiveDate,
) -> Result<SecondsSinceDayStart, BadDateTime> {
    let nb_of_days = datetime.date().signed_duration_since(service_day).num_days();
    let seconds = nb_of_days * SECONDS_IN_A_DAY + i64::from(datetime.num_seconds_from_midnight());
    if seconds < i64::from(i32::MIN) || seconds > i64::from(i32::MAX) {
        return Err(BadDateTime {
            string_datetime: datetime.format("%Y%m%dT%H%M%S").to_string(),
        });
    }
    Ok(SecondsSinceDayStart::from_seconds(seconds as i32))
}

#[derive(Debug)]
pub struct BadDateTime {
    string_datetime: String,
}

impl std::error::Error for BadDateTime {}

impl std::fmt::Display for BadDateTime {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "Unable to parse {} as a datetime. Expected format is 20190628T163215",
            self.string_datetime
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_and_convert() {
        let datetime = parse_datetime("20210101T083000").unwrap();
        let day = NaiveDate::from_ymd_opt(2021, 1, 1).unwrap();
        assert_eq!(
            seconds_since_day_start(&datetime, day).unwrap(),
            SecondsSinceDayStart::from_hms(8, 30, 0)
        );
        let previous_day = NaiveDate::from_ymd_opt(2020, 12, 31).unwrap();
        assert_eq!(
            seconds_since_day_start(&datetime, previous_day).unwrap(),
            SecondsSinceDayStart::from_hms(32, 30, 0)
        );
        let next_day = NaiveDate::from_ymd_opt(2021, 1, 2).unwrap();
        assert_eq!(
            seconds_since_day_start(&datetime, next_day).unwrap(),
            SecondsSinceDayStart::from_hms(-15, -30, 0)
        );
    }

    #[test]
    fn bad_datetime() {
        let err = parse_datetime("2021-01-01 08:30").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Unable to parse 2021-01-01 08:30 as a datetime. Expected format is 20190628T163215"
        );
    }
}
