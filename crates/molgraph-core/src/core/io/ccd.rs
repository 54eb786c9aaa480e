use super::traits::ModelWriter;
use crate::core::models::molecule::MolecularModel;
use crate::core::models::topology::{BondOrder, infer_bond_order};
use std::io::{self, Write};

/// Scale factor from model coordinates (nanometers) to dictionary
/// coordinates (Ångström).
const NM_TO_ANGSTROM: f64 = 10.0;

const DISCLAIMER: &str = "\
#
# Note:
#  - The stereo config flags have not been set.
#  - The double bond flag is only set for C=C, C=N, N=N, and C=O bonds;
#    the bond-length cutoffs are derived from those used by eLBOW (Phenix).
#
";

const ATOM_LOOP_HEADER: &str = "\
loop_
_chem_comp_atom.comp_id
_chem_comp_atom.atom_id
_chem_comp_atom.alt_atom_id
_chem_comp_atom.type_symbol
_chem_comp_atom.charge
_chem_comp_atom.pdbx_align
_chem_comp_atom.pdbx_aromatic_flag
_chem_comp_atom.pdbx_leaving_atom_flag
_chem_comp_atom.pdbx_stereo_config
_chem_comp_atom.model_Cartn_x
_chem_comp_atom.model_Cartn_y
_chem_comp_atom.model_Cartn_z
_chem_comp_atom.pdbx_model_Cartn_x_ideal
_chem_comp_atom.pdbx_model_Cartn_y_ideal
_chem_comp_atom.pdbx_model_Cartn_z_ideal
_chem_comp_atom.pdbx_component_atom_id
_chem_comp_atom.pdbx_component_comp_id
_chem_comp_atom.pdbx_ordinal
";

const BOND_LOOP_HEADER: &str = "\
loop_
_chem_comp_bond.comp_id
_chem_comp_bond.atom_id_1
_chem_comp_bond.atom_id_2
_chem_comp_bond.value_order
_chem_comp_bond.pdbx_aromatic_flag
_chem_comp_bond.pdbx_stereo_config
_chem_comp_bond.pdbx_ordinal
";

/// Options for the chemical-component-dictionary writer.
#[derive(Debug, Clone)]
pub struct CcdOptions {
    /// The component code used throughout the block (three-letter style).
    pub component_id: String,
}

impl Default for CcdOptions {
    fn default() -> Self {
        Self {
            component_id: "UNL".to_string(),
        }
    }
}

/// The chemical-component-dictionary (mmCIF-style) format: one `data_` block
/// with component descriptors, an atom loop, and a bond loop.
pub struct CcdFile;

impl ModelWriter for CcdFile {
    type Options = CcdOptions;
    type Error = io::Error;

    fn write_to(
        model: &MolecularModel,
        options: &Self::Options,
        writer: &mut impl Write,
    ) -> Result<(), Self::Error> {
        let comp_id = options.component_id.as_str();

        writeln!(writer, "data_{}", comp_id)?;
        writer.write_all(DISCLAIMER.as_bytes())?;
        write_descriptors(model, comp_id, writer)?;

        let aromatic_atoms = model.aromatic_atom_ids();

        writeln!(writer, "#")?;
        writer.write_all(ATOM_LOOP_HEADER.as_bytes())?;
        for (ordinal, (id, atom)) in model.atoms().enumerate() {
            let model_coord = atom.coord * NM_TO_ANGSTROM;
            let ideal_coord = atom.effective_coord() * NM_TO_ANGSTROM;
            let aromatic = if aromatic_atoms.contains(&id) { "Y" } else { "N" };
            writeln!(
                writer,
                "{:<3} {:<3} {:<3} {:<2} {} {} {} {} {} {:>6.3} {:>6.3} {:>6.3} {:>6.3} {:>6.3} {:>6.3} {:<3} {:<3} {}",
                comp_id,
                atom.label,
                atom.label,
                atom.element,
                0,
                1,
                aromatic,
                "N",
                "N",
                model_coord.x,
                model_coord.y,
                model_coord.z,
                ideal_coord.x,
                ideal_coord.y,
                ideal_coord.z,
                atom.label,
                comp_id,
                ordinal + 1
            )?;
        }

        if !model.bonds().is_empty() {
            writeln!(writer, "#")?;
            writer.write_all(BOND_LOOP_HEADER.as_bytes())?;
            for (ordinal, bond) in model.bonds().iter().enumerate() {
                let (Some(atom1), Some(atom2)) =
                    (model.atom(bond.atom1_id), model.atom(bond.atom2_id))
                else {
                    continue;
                };
                let order = bond
                    .length
                    .or_else(|| model.geometric_bond_length(bond))
                    .map(|length| infer_bond_order(length, &atom1.element, &atom2.element))
                    .unwrap_or_default();
                let value_order = match order {
                    BondOrder::Single => "SING",
                    BondOrder::Double => "DOUB",
                };
                let aromatic = if aromatic_atoms.contains(&bond.atom1_id)
                    && aromatic_atoms.contains(&bond.atom2_id)
                {
                    "Y"
                } else {
                    "N"
                };
                writeln!(
                    writer,
                    "{:<3} {:<3} {:<3} {:<4} {} {} {}",
                    comp_id, atom1.label, atom2.label, value_order, aromatic, "N", ordinal + 1
                )?;
            }
        }

        writeln!(writer, "#")?;
        Ok(())
    }
}

fn write_descriptors(
    model: &MolecularModel,
    comp_id: &str,
    writer: &mut impl Write,
) -> Result<(), io::Error> {
    let name = cif_value(model.name());
    let charge = model
        .net_charge()
        .map(|c| c.to_string())
        .unwrap_or_else(|| "?".to_string());

    let fields: [(&str, &str); 24] = [
        ("_chem_comp.id", comp_id),
        ("_chem_comp.name", name.as_str()),
        ("_chem_comp.type", "NON-POLYMER"),
        ("_chem_comp.pdbx_type", "?"),
        ("_chem_comp.formula", "?"),
        ("_chem_comp.mon_nstd_parent_comp_id", "?"),
        ("_chem_comp.pdbx_synonyms", "?"),
        ("_chem_comp.pdbx_formal_charge", charge.as_str()),
        ("_chem_comp.pdbx_initial_date", "?"),
        ("_chem_comp.pdbx_modified_date", "?"),
        ("_chem_comp.pdbx_ambiguous_flag", "N"),
        ("_chem_comp.pdbx_release_status", "?"),
        ("_chem_comp.pdbx_replaced_by", "?"),
        ("_chem_comp.pdbx_replaces", "?"),
        ("_chem_comp.formula_weight", "?"),
        ("_chem_comp.one_letter_code", "?"),
        ("_chem_comp.three_letter_code", comp_id),
        ("_chem_comp.pdbx_model_coordinates_details", "?"),
        ("_chem_comp.pdbx_model_coordinates_missing_flag", "N"),
        ("_chem_comp.pdbx_ideal_coordinates_details", "?"),
        ("_chem_comp.pdbx_ideal_coordinates_missing_flag", "N"),
        ("_chem_comp.pdbx_model_coordinates_db_code", "?"),
        ("_chem_comp.pdbx_subcomponent_list", "?"),
        ("_chem_comp.pdbx_processing_site", "?"),
    ];
    for (key, value) in &fields {
        writeln!(writer, "{:<50}{}", key, value)?;
    }
    Ok(())
}

fn cif_value(value: &str) -> String {
    if value.is_empty() {
        "?".to_string()
    } else if value.contains(' ') {
        format!("\"{}\"", value)
    } else {
        value.to_string()
    }
}
