use crate::constants::{DAY_NAMES, DAY_NAMES_DISPLAY, MONTH_NAMES, SCHEDULE_PAGE_FILE};
use crate::error::Result;
use crate::types::{Departure, Port};
use crate::week::seconds_to_time;
use chrono::{Datelike, NaiveDate, NaiveDateTime};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

const PAGE_STYLE: &str = r#"
        body {
            font-family: 'Segoe UI', Tahoma, Geneva, Verdana, sans-serif;
            max-width: 1400px;
            margin: 0 auto;
            padding: 20px;
            background: linear-gradient(135deg, #667eea 0%, #764ba2 100%);
            color: #333;
        }
        .container {
            background: white;
            border-radius: 15px;
            padding: 30px;
            box-shadow: 0 10px 40px rgba(0,0,0,0.2);
        }
        h1 { color: #667eea; text-align: center; margin-bottom: 10px; }
        h2 { color: #764ba2; margin-top: 30px; margin-bottom: 15px; }
        .subtitle { text-align: center; color: #666; margin-bottom: 30px; }
        .info {
            background: #f0f4ff;
            border-left: 4px solid #667eea;
            padding: 15px;
            margin: 20px 0;
            border-radius: 5px;
        }
        .schedule-table {
            width: 100%;
            border-collapse: collapse;
            margin: 20px 0;
            background: white;
            box-shadow: 0 2px 8px rgba(0,0,0,0.1);
            border-radius: 8px;
            overflow: hidden;
        }
        .schedule-table thead {
            background: linear-gradient(135deg, #667eea 0%, #764ba2 100%);
            color: white;
        }
        .schedule-table th { padding: 15px; text-align: left; font-weight: 600; }
        .schedule-table td { padding: 12px 15px; border-bottom: 1px solid #e0e0e0; }
        .vessel-cell { font-weight: 600; color: #667eea; }
        .datetime-cell { font-family: 'Courier New', monospace; font-size: 14px; }
        .today { background: #fff9e6 !important; }
        .today .vessel-cell { color: #f5576c; }
        .footer {
            text-align: center;
            margin-top: 30px;
            padding-top: 20px;
            border-top: 2px solid #e0e0e0;
            color: #666;
            font-size: 14px;
        }
"#;

const ERROR_STYLE: &str = r#"
        body {
            font-family: 'Segoe UI', Tahoma, Geneva, Verdana, sans-serif;
            max-width: 1200px;
            margin: 0 auto;
            padding: 20px;
            background: linear-gradient(135deg, #f093fb 0%, #f5576c 100%);
        }
        .container {
            background: white;
            border-radius: 15px;
            padding: 30px;
            box-shadow: 0 10px 40px rgba(0,0,0,0.2);
        }
        h1 { color: #f5576c; text-align: center; }
        .error {
            background: #fff5f5;
            border-left: 4px solid #f5576c;
            padding: 15px;
            margin: 20px 0;
            border-radius: 5px;
        }
        .footer {
            text-align: center;
            margin-top: 30px;
            padding-top: 20px;
            border-top: 2px solid #e0e0e0;
            color: #666;
            font-size: 14px;
        }
"#;

/// "Lundi 25 novembre" for a schedule row.
fn french_day_date(date: NaiveDate) -> String {
    let day_name = DAY_NAMES[date.weekday().num_days_from_monday() as usize];
    let month = MONTH_NAMES[date.month0() as usize];
    format!("{} {} {}", day_name, date.day(), month)
}

/// "lundi 25 novembre 2024" for the page header.
fn french_full_date(date: NaiveDate) -> String {
    let day_name = DAY_NAMES_DISPLAY[date.weekday().num_days_from_monday() as usize];
    let month = MONTH_NAMES[date.month0() as usize];
    format!("{} {} {} {}", day_name, date.day(), month, date.year())
}

fn direction_rows(departures: &[Departure], origin: Port, today: NaiveDate) -> String {
    let rows: Vec<String> = departures
        .iter()
        .filter(|d| d.origin == origin)
        .map(|d| {
            let row_class = if d.timestamp.date() == today { "today" } else { "" };
            format!(
                r#"          <tr class="{}">
            <td class="vessel-cell">{}</td>
            <td class="datetime-cell">{} - {}</td>
          </tr>"#,
                row_class,
                d.vessel_name,
                french_day_date(d.timestamp.date()),
                seconds_to_time(d.time_begin)
            )
        })
        .collect();

    if rows.is_empty() {
        r#"          <tr><td colspan="2">Aucun horaire disponible</td></tr>"#.to_string()
    } else {
        rows.join("\n")
    }
}

/// Render the full schedule page: one table per direction, sorted input
/// assumed, today's rows highlighted.
pub fn render_schedule_page(
    departures: &[Departure],
    current_week: u32,
    next_week: u32,
    year: i32,
    now: NaiveDateTime,
) -> String {
    let today = now.date();
    let to_moorea = direction_rows(departures, Port::Papeete, today);
    let to_tahiti = direction_rows(departures, Port::Moorea, today);

    format!(
        r#"<!DOCTYPE html>
<html lang="fr">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Horaires Ferries Tahiti-Moorea - Toutes Compagnies</title>
    <style>{style}</style>
</head>
<body>
    <div class="container">
        <h1>🚢 Horaires Ferries Tahiti-Moorea</h1>
        <div class="subtitle">Semaines {current_week} et {next_week} de {year} - {date}</div>

        <div class="info">
            <strong>ℹ️ Informations:</strong><br>
            Cette page affiche les horaires de toutes les compagnies maritimes desservant la liaison Tahiti-Moorea pour les deux prochaines semaines.<br>
            Dernière mise à jour: {updated}
        </div>

        <h2>🚢 Départs Papeete → Moorea</h2>
        <table class="schedule-table">
            <thead>
                <tr>
                    <th>Nom du Bateau</th>
                    <th>Jour et Heure du Départ</th>
                </tr>
            </thead>
            <tbody>
{to_moorea}
            </tbody>
        </table>

        <h2>🚢 Départs Moorea → Papeete</h2>
        <table class="schedule-table">
            <thead>
                <tr>
                    <th>Nom du Bateau</th>
                    <th>Jour et Heure du Départ</th>
                </tr>
            </thead>
            <tbody>
{to_tahiti}
            </tbody>
        </table>

        <div class="footer">
            <p>🔄 Page générée automatiquement</p>
            <p>Projet: Moorea Life Schedule</p>
        </div>
    </div>
</body>
</html>"#,
        style = PAGE_STYLE,
        current_week = current_week,
        next_week = next_week,
        year = year,
        date = french_full_date(today),
        updated = now.format("%d/%m/%Y à %H:%M:%S"),
        to_moorea = to_moorea,
        to_tahiti = to_tahiti,
    )
}

/// Render the page shown when no schedule data could be obtained at all.
pub fn render_error_page(error_message: &str, now: NaiveDateTime) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="fr">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Horaires Ferries Tahiti-Moorea - Erreur</title>
    <style>{style}</style>
</head>
<body>
    <div class="container">
        <h1>❌ Erreur de récupération des données</h1>

        <div class="error">
            <strong>Message d'erreur:</strong><br>
            {message}
        </div>

        <div class="error">
            <strong>ℹ️ Informations:</strong><br>
            La tentative de récupération des horaires a échoué.<br>
            Cela peut être dû à:<br>
            <ul>
                <li>Les données ne sont pas accessibles en lecture publique</li>
                <li>Les règles de sécurité de la base distante bloquent l'accès</li>
                <li>Aucune compagnie n'a fourni de données pour ces semaines</li>
            </ul>
        </div>

        <div class="footer">
            <p>Date de la tentative: {attempted}</p>
            <p>🔄 Page générée automatiquement</p>
        </div>
    </div>
</body>
</html>"#,
        style = ERROR_STYLE,
        message = error_message,
        attempted = now.format("%d/%m/%Y à %H:%M:%S"),
    )
}

pub fn write_schedule_page(
    departures: &[Departure],
    output_dir: &Path,
    current_week: u32,
    next_week: u32,
    year: i32,
    now: NaiveDateTime,
) -> Result<PathBuf> {
    let path = output_dir.join(SCHEDULE_PAGE_FILE);
    let html = render_schedule_page(departures, current_week, next_week, year, now);
    fs::write(&path, html)?;
    info!("Wrote schedule page to {}", path.display());
    Ok(path)
}

pub fn write_error_page(
    error_message: &str,
    output_dir: &Path,
    now: NaiveDateTime,
) -> Result<PathBuf> {
    let path = output_dir.join(SCHEDULE_PAGE_FILE);
    fs::write(&path, render_error_page(error_message, now))?;
    info!("Wrote error page to {}", path.display());
    Ok(path)
}
