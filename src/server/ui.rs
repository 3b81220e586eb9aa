//! Browser form served at `GET /`

pub const FORM_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Insurance Premium Predictor</title>
<style>
  body { font-family: system-ui, sans-serif; margin: 0; background: #f4f6f8; color: #1f2933; }
  header { background: #1f4e79; color: #fff; padding: 1rem 2rem; }
  main { display: grid; grid-template-columns: 2fr 1fr; gap: 1.5rem; padding: 1.5rem 2rem; }
  fieldset { border: 1px solid #cbd2d9; border-radius: 6px; margin-bottom: 1rem; background: #fff; }
  legend { font-weight: 600; padding: 0 .4rem; }
  .grid { display: grid; grid-template-columns: repeat(3, 1fr); gap: .6rem 1rem; }
  label { display: flex; flex-direction: column; font-size: .85rem; }
  input, select { margin-top: .2rem; padding: .3rem; font-size: .95rem; }
  button { background: #1f4e79; color: #fff; border: 0; border-radius: 4px; padding: .6rem 1.4rem; font-size: 1rem; cursor: pointer; }
  #result { background: #fff; border: 1px solid #cbd2d9; border-radius: 6px; padding: 1rem; }
  .category { font-size: 1.6rem; font-weight: 700; }
  .Low { color: #2f855a; } .Medium { color: #b7791f; } .High { color: #c53030; }
  .bar { display: flex; align-items: center; margin: .3rem 0; }
  .bar span { width: 5rem; }
  .bar div { height: 1rem; background: #1f4e79; margin-right: .5rem; }
  .error { color: #c53030; white-space: pre-wrap; }
  #status { font-size: .9rem; margin-top: .3rem; }
</style>
</head>
<body>
<header>
  <h1>Insurance Premium Predictor</h1>
  <div id="status">Checking service...</div>
</header>
<main>
<form id="form">
  <fieldset><legend>Personal</legend><div class="grid">
    <label>Age<input name="Age" type="number" min="1" max="119" step="1" value="30" required></label>
    <label>Gender<select name="Gender"><option>Male</option><option>Female</option><option>Other</option></select></label>
    <label>Marital status<select name="Marital_Status"><option>Single</option><option>Married</option><option>Divorced</option><option>Widowed</option></select></label>
    <label>Occupation<select name="Occupation"><option>Private Job</option><option>Farmer</option><option>Freelancer</option><option>Teacher</option><option>Student</option><option>Doctor</option><option>Unemployed</option><option>Construction Worker</option></select></label>
    <label>Education<select name="Education"><option>None</option><option>Primary</option><option>SSC</option><option>HSC</option><option selected>Bachelor</option><option>Master</option><option>PhD</option></select></label>
    <label>Monthly income<input name="Monthly_Income" type="number" min="1" step="any" value="50000" required></label>
    <label>Area type<select name="Area_Type"><option>Urban</option><option>Rural</option><option>Semi-urban</option></select></label>
  </div></fieldset>
  <fieldset><legend>Health &amp; lifestyle</legend><div class="grid">
    <label>BMI<input name="BMI" type="number" min="10" max="50" step="0.1" value="25" required></label>
    <label>Smoking<select name="Smoking_Status"><option>Never</option><option>Former</option><option>Current</option></select></label>
    <label>Alcohol<select name="Alcohol_Consumption"><option>Never</option><option>Occasional</option><option>Regular</option></select></label>
    <label>Physical activity (h/week)<input name="Physical_Activity_hr_wk" type="number" min="0.1" step="0.1" value="5" required></label>
    <label>Sleep (h/day)<input name="Sleep_hr_day" type="number" min="1" max="24" step="0.1" value="7" required></label>
    <label>Family history<select name="Family_History"><option>No</option><option>Yes</option></select></label>
    <label>Preexisting condition<select name="Preexisting_Condition"><option>None</option><option>Asthma</option><option>Diabetes</option><option>Hypertension</option><option>Heart Disease</option></select></label>
    <label>Doctor visits last year<input name="Doctor_Visits_Last_Year" type="number" min="1" max="50" step="1" value="2" required></label>
    <label>Current medications<select name="Current_Medications"><option>No</option><option>Yes</option></select></label>
    <label>Stress level<select name="Stress_Level"><option>Low</option><option>Moderate</option><option>High</option></select></label>
    <label>Pollution exposure<select name="Pollution_Exposure"><option>Low</option><option>Moderate</option><option>High</option></select></label>
    <label>Food habit<select name="Food_Habit"><option>Home-cooked</option><option>Mostly Restaurant</option><option>Mixed</option></select></label>
  </div></fieldset>
  <fieldset><legend>Policy</legend><div class="grid">
    <label>Claim history<input name="Claim_History" type="number" min="0" max="20" step="1" value="0" required></label>
    <label>Claim amount last year<input name="Claim_Amount_Last_Year" type="number" min="0" step="any" value="0" required></label>
    <label>Insurance type<select name="Insurance_Type"><option>Comprehensive</option><option selected>Basic</option><option>Family</option><option>Critical Illness</option></select></label>
    <label>Policy tenure (years)<input name="Policy_Tenure" type="number" min="1" max="10" step="1" value="5" required></label>
    <label>Premium paid last year<input name="Premium_Paid_Last_Year" type="number" min="0" step="any" value="0" required></label>
    <label>Loyalty score<input name="Loyalty_Score" type="number" min="0.01" max="1" step="0.01" value="0.5" required></label>
  </div></fieldset>
  <button type="submit">Predict premium</button>
</form>
<p id="error" class="error" hidden></p>
<section id="result"><p>Fill in the form and press <em>Predict premium</em>.</p></section>
</main>
<script>
const INTEGER_FIELDS = ["Age", "Doctor_Visits_Last_Year", "Claim_History", "Policy_Tenure"];
const MESSAGES = {
  Low: "Good news: you are likely to qualify for lower premium rates.",
  Medium: "You are likely to be offered standard premium rates.",
  High: "Higher premium rates may apply to your profile."
};

function riskFactors(input) {
  const risks = [];
  if (input.Smoking_Status === "Current") risks.push("Current smoker");
  if (input.Alcohol_Consumption === "Regular") risks.push("Regular alcohol consumption");
  if (input.Stress_Level === "High") risks.push("High stress level");
  if (input.Pollution_Exposure === "High") risks.push("High pollution exposure");
  if (input.Preexisting_Condition !== "None") risks.push("Preexisting condition: " + input.Preexisting_Condition);
  if (input.BMI > 30) risks.push("BMI above 30");
  if (input.Physical_Activity_hr_wk < 2) risks.push("Less than 2 hours of physical activity per week");
  return risks;
}

function collect(form) {
  const input = {};
  for (const el of form.elements) {
    if (!el.name) continue;
    if (el.type === "number") {
      input[el.name] = INTEGER_FIELDS.includes(el.name) ? parseInt(el.value, 10) : parseFloat(el.value);
    } else {
      input[el.name] = el.value;
    }
  }
  return input;
}

const PREDICT_TIMEOUT_MS = 30000;

function render(result, input) {
  const pct = (p) => (p * 100).toFixed(1) + "%";
  let html = '<div class="category ' + result.premium_category + '">' + result.premium_category + ' premium</div>';
  html += "<p>" + (MESSAGES[result.premium_category] || "") + "</p>";
  html += "<p>Confidence: <strong>" + pct(result.confidence) + "</strong></p><h3>Probabilities</h3>";
  for (const [label, p] of Object.entries(result.probabilities)) {
    html += '<div class="bar"><span>' + label + '</span><div style="width:' + (p * 200).toFixed(0) + 'px"></div>' + pct(p) + "</div>";
  }
  const risks = riskFactors(input);
  html += "<h3>Risk factors (local hints, not model output)</h3>";
  html += risks.length ? "<ul>" + risks.map((r) => "<li>" + r + "</li>").join("") + "</ul>" : "<p>No notable risk factors.</p>";
  document.getElementById("result").innerHTML = html;
}

// errors go to their own element; the last result stays on screen
function showError(message) {
  const box = document.getElementById("error");
  box.textContent = message;
  box.hidden = false;
}

function clearError() {
  const box = document.getElementById("error");
  box.textContent = "";
  box.hidden = true;
}

async function checkHealth() {
  const status = document.getElementById("status");
  try {
    const body = await (await fetch("/health")).json();
    status.textContent = body.model_status === "healthy" ? "Service connected, model ready" : "Service connected, model not loaded";
  } catch (e) {
    status.textContent = "Service unreachable";
  }
}

document.getElementById("form").addEventListener("submit", async (event) => {
  event.preventDefault();
  const input = collect(event.target);
  let response;
  try {
    response = await fetch("/predict", {
      method: "POST",
      headers: { "Content-Type": "application/json" },
      body: JSON.stringify(input),
      signal: AbortSignal.timeout(PREDICT_TIMEOUT_MS)
    });
  } catch (e) {
    if (e.name === "TimeoutError") {
      showError("The prediction service did not answer within " + PREDICT_TIMEOUT_MS / 1000 + " s");
    } else {
      showError("Could not reach the prediction service: " + e);
    }
    return;
  }
  let body;
  try {
    body = await response.json();
  } catch (e) {
    showError(response.ok
      ? "Could not decode the prediction response"
      : "API error " + response.status + ": " + response.statusText);
    return;
  }
  if (!response.ok) {
    showError("API error " + response.status + ": " + (body.detail || "unknown error"));
    return;
  }
  clearError();
  render(body, input);
});

checkHealth();
</script>
</body>
</html>
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FIELDS;

    #[test]
    fn test_form_has_every_field() {
        for field in FIELDS.iter() {
            assert!(
                FORM_HTML.contains(&format!("name=\"{}\"", field.name)),
                "form is missing {}",
                field.name
            );
        }
    }

    #[test]
    fn test_form_errors_do_not_replace_result() {
        assert!(FORM_HTML.contains(r#"<p id="error""#));
        assert!(!FORM_HTML.contains(r#"box.innerHTML = ""#));
    }

    #[test]
    fn test_form_predict_timeout_matches_client() {
        let millis = crate::client::PREDICT_TIMEOUT.as_millis();
        assert!(FORM_HTML.contains(&format!("const PREDICT_TIMEOUT_MS = {};", millis)));
        assert!(FORM_HTML.contains("AbortSignal.timeout(PREDICT_TIMEOUT_MS)"));
    }
}
