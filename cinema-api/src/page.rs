use std::fmt::Write;

use axum::{extract::State, response::Html, routing::get, Router};
use cinema_booking::DeskSnapshot;

use crate::error::AppError;
use crate::state::AppState;

const STYLE: &str = r#"
body { font-family: sans-serif; margin: 0; padding: 20px; background-color: #f4f4f9; }
h1, h2, h3 { text-align: center; color: #333; }
#showtimes { display: flex; flex-wrap: wrap; justify-content: center; gap: 20px; }
.showtime { border: 1px solid #ccc; border-radius: 8px; padding: 20px; background: #fff; max-width: 300px; width: 100%; }
.seat-row { display: flex; justify-content: center; gap: 5px; margin-top: 5px; }
.seat { width: 36px; height: 30px; background-color: #4CAF50; color: white; border: none; border-radius: 4px; cursor: pointer; }
.seat:disabled { background-color: #ccc; cursor: not-allowed; }
#notification, #booking-history, #delete-booking { margin-top: 20px; text-align: center; }
#notification { color: #e74c3c; }
table { width: 100%; border-collapse: collapse; }
th, td { padding: 8px 12px; text-align: left; border-bottom: 1px solid #ddd; }
"#;

const SCRIPT: &str = r#"
async function post(url, body) {
    const response = await fetch(url, {
        method: 'POST',
        headers: { 'Content-Type': 'application/json' },
        body: JSON.stringify(body)
    });
    return response.json();
}

async function selectSeat(button, showtime, seat) {
    const name = prompt("Enter your name:");
    if (!name) return;
    const data = await post('/v1/bookings', { showtime, seat, name });
    const note = document.getElementById('notification');
    if (data.status === 'success') {
        button.disabled = true;
        note.textContent = data.message + ' - ' + data.movie;
    } else {
        note.textContent = data.error;
    }
}

async function deleteBooking() {
    const name = document.getElementById('delete-name').value;
    if (!name) { alert("Please enter your name."); return; }
    const data = await post('/delete', { name });
    document.getElementById('notification').textContent = data.message || data.error;
    if (data.status === 'success') setTimeout(() => window.location.reload(), 2000);
}
"#;

pub fn routes() -> Router<AppState> {
    Router::new().route("/", get(index))
}

async fn index(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let snapshot = state.desk.read().await.snapshot();
    Ok(Html(render_page(&snapshot)?))
}

pub fn render_page(snapshot: &DeskSnapshot) -> anyhow::Result<String> {
    let mut html = String::new();
    write!(
        html,
        "<!DOCTYPE html><html lang=\"en\"><head><meta charset=\"UTF-8\">\
         <title>Movie Ticket Booking System</title><style>{STYLE}</style></head><body>\
         <h1>Movie Ticket Booking System</h1><h2>Select a Showtime</h2><div id=\"showtimes\">"
    )?;
    render_showtimes(&mut html, snapshot)?;
    write!(html, "</div><div id=\"notification\"></div>")?;

    write!(html, "<div id=\"booking-history\"><h2>Booking History</h2>")?;
    render_history(&mut html, snapshot)?;
    write!(
        html,
        "</div><div id=\"delete-booking\"><h3>Delete Booking</h3>\
         <input type=\"text\" id=\"delete-name\" placeholder=\"Enter your name\">\
         <button type=\"button\" onclick=\"deleteBooking()\">Delete</button></div>\
         <script>{SCRIPT}</script></body></html>"
    )?;
    Ok(html)
}

fn render_showtimes(html: &mut String, snapshot: &DeskSnapshot) -> std::fmt::Result {
    for (key, showtime) in snapshot.showtimes.iter() {
        write!(
            html,
            "<div class=\"showtime\"><strong>{}</strong><br>Showtime: {} &middot; {} ({}/{})",
            escape(&showtime.movie),
            escape(key),
            showtime.formation,
            showtime.sold_tickets(),
            showtime.max_tickets(),
        )?;
        for (_, seats) in showtime.seat_rows() {
            html.push_str("<div class=\"seat-row\">");
            for (seat, free) in seats {
                write!(
                    html,
                    "<button class=\"seat\" {} onclick=\"selectSeat(this, '{}', '{}')\">{}</button>",
                    if free { "" } else { "disabled" },
                    escape(key),
                    seat,
                    seat,
                )?;
            }
            html.push_str("</div>");
        }
        html.push_str("</div>");
    }
    Ok(())
}

fn render_history(html: &mut String, snapshot: &DeskSnapshot) -> std::fmt::Result {
    if snapshot.bookings.is_empty() {
        html.push_str("<p>No bookings found.</p>");
        return Ok(());
    }

    html.push_str(
        "<table><thead><tr><th>Name</th><th>Movie</th><th>Showtime</th>\
         <th>Seat</th><th>Purchase Date</th></tr></thead><tbody>",
    );
    for record in snapshot.bookings.records() {
        write!(
            html,
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            escape(&record.name),
            escape(&record.movie),
            escape(&record.showtime),
            record.seat,
            record.purchase_date_display(),
        )?;
    }
    html.push_str("</tbody></table>");
    Ok(())
}

fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
